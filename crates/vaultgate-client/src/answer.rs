//! HTTP client for the answer-generation (RAG) service.
//!
//! One service exposes both retrieval strategies on separate endpoints; the
//! gateway constructs one client per strategy and the answer orchestrator
//! picks between them.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

use vaultgate_core::{defaults, AiMessage, AnswerBackend, MessageRecord, Result};

use crate::http::ServiceClient;

/// Answer service client bound to one retrieval endpoint.
#[derive(Clone)]
pub struct HttpAnswerClient {
    http: ServiceClient,
    endpoint: &'static str,
}

#[derive(Serialize)]
struct AnswerQuery<'a> {
    vault_id: Option<Uuid>,
    query: &'a str,
    history: &'a [MessageRecord],
}

impl HttpAnswerClient {
    /// Client for the graph-retrieval strategy. Also serves queries with no
    /// resolvable vault.
    pub fn graph(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http: ServiceClient::new(client, "RAG", base_url),
            endpoint: "/graph_answer",
        }
    }

    /// Client for the vector-retrieval strategy.
    pub fn vector(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http: ServiceClient::new(client, "RAG", base_url),
            endpoint: "/vector_answer",
        }
    }
}

#[async_trait]
impl AnswerBackend for HttpAnswerClient {
    async fn answer(
        &self,
        vault_id: Option<Uuid>,
        query: &str,
        history: &[MessageRecord],
    ) -> Result<AiMessage> {
        self.http
            .call_with_timeout(
                Method::POST,
                self.endpoint,
                &AnswerQuery {
                    vault_id,
                    query,
                    history,
                },
                Duration::from_secs(defaults::ANSWER_TIMEOUT_SECS),
            )
            .await
    }
}
