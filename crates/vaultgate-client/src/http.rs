//! Remote call wrapper: one HTTP call to a named downstream service.
//!
//! This is the single seam where transport failures are normalized into the
//! gateway error taxonomy. Orchestrators consume only the four outcome kinds
//! (`Unavailable`, `BadGateway`, `Upstream`, `Internal`), never raw reqwest
//! errors.

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use vaultgate_core::{defaults, Error, Result};

/// Structured error body the downstream services agree on.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Wrapper around one downstream service's base URL and display name.
///
/// Clones share the underlying connection pool.
#[derive(Clone)]
pub struct ServiceClient {
    client: Client,
    service: String,
    base_url: String,
}

impl ServiceClient {
    pub fn new(client: Client, service: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            service: service.into(),
            base_url: base_url.into(),
        }
    }

    /// The service display name used in error messages.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Issue a JSON call with the default timeout and decode the response body.
    pub async fn call<Req, Resp>(&self, method: Method, path: &str, payload: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        self.call_with_timeout(
            method,
            path,
            payload,
            Duration::from_secs(defaults::CALL_TIMEOUT_SECS),
        )
        .await
    }

    /// Issue a JSON call with an explicit timeout (heavy paths: uploads,
    /// answer generation).
    pub async fn call_with_timeout<Req, Resp>(
        &self,
        method: Method,
        path: &str,
        payload: &Req,
        timeout: Duration,
    ) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(service = %self.service, %url, "Dispatching downstream call");

        let response = self
            .client
            .request(method, &url)
            .timeout(timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        self.decode(response).await
    }

    /// Issue a JSON call whose success body is discarded.
    pub async fn call_unit<Req>(&self, method: Method, path: &str, payload: &Req) -> Result<()>
    where
        Req: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(service = %self.service, %url, "Dispatching downstream call");

        let response = self
            .client
            .request(method, &url)
            .timeout(Duration::from_secs(defaults::CALL_TIMEOUT_SECS))
            .json(payload)
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        if response.status().as_u16() >= 400 {
            return Err(self.upstream_error(response).await);
        }
        Ok(())
    }

    /// Issue a multipart POST (vault creation, document upload).
    pub async fn post_multipart<Resp>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        timeout: Duration,
    ) -> Result<Resp>
    where
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(service = %self.service, %url, "Dispatching multipart call");

        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        self.decode(response).await
    }

    async fn decode<Resp: DeserializeOwned>(&self, response: reqwest::Response) -> Result<Resp> {
        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(self.upstream_error(response).await);
        }

        response.json::<Resp>().await.map_err(|e| {
            warn!(service = %self.service, "Malformed success body: {}", e);
            Error::BadGateway(self.service.clone())
        })
    }

    /// An HTTP status >= 400 with a well-formed error body passes through
    /// unchanged; anything else is a bad gateway.
    async fn upstream_error(&self, response: reqwest::Response) -> Error {
        let status: StatusCode = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => Error::Upstream {
                status: status.as_u16(),
                detail: body.detail,
            },
            Err(e) => {
                warn!(service = %self.service, status = status.as_u16(), "Malformed error body: {}", e);
                Error::BadGateway(self.service.clone())
            }
        }
    }

    fn classify_transport(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() || e.is_connect() {
            warn!(service = %self.service, "Service unreachable: {}", e);
            Error::Unavailable(self.service.clone())
        } else if e.is_decode() {
            warn!(service = %self.service, "Response decode failure: {}", e);
            Error::BadGateway(self.service.clone())
        } else {
            warn!(service = %self.service, "Unexpected transport error: {}", e);
            Error::Internal(format!("{} call failed: {}", self.service, e))
        }
    }
}
