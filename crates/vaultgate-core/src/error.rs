//! Error types for vaultgate.
//!
//! Every downstream-service failure is normalized into this taxonomy at the
//! remote call wrapper; orchestrators never see raw transport errors.

use thiserror::Error;

/// Result type alias using vaultgate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for gateway operations.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Downstream service could not be reached (connect failure or timeout).
    #[error("{0} service unavailable")]
    Unavailable(String),

    /// Downstream service answered with a body that is not the expected JSON shape.
    #[error("{0} service returned a malformed response")]
    BadGateway(String),

    /// Structured 4xx/5xx from a downstream service, passed through unchanged.
    #[error("{status}: {detail}")]
    Upstream { status: u16, detail: String },

    /// Unexpected failure inside the gateway itself.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Configuration error (bad env var, init failure).
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP-equivalent status code for this error when surfaced to a caller.
    ///
    /// `Upstream` keeps its original status; everything else maps to the
    /// gateway-side code for its failure class.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Unavailable(_) => 503,
            Error::BadGateway(_) => 502,
            Error::Upstream { status, .. } => *status,
            Error::Internal(_) | Error::Config(_) => 500,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Internal(format!("serialization failed: {}", e))
    }
}
