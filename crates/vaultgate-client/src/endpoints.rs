//! Downstream service base URLs, read once at startup.

use vaultgate_core::defaults;

/// Base URLs of the four downstream services.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub chats: String,
    pub history: String,
    pub vaults: String,
    pub rag: String,
}

impl Endpoints {
    /// Read base URLs from the environment with localhost defaults.
    pub fn from_env() -> Self {
        Self {
            chats: std::env::var("CHATS_SERVICE_URL")
                .unwrap_or_else(|_| defaults::CHATS_SERVICE_URL.to_string()),
            history: std::env::var("HISTORY_SERVICE_URL")
                .unwrap_or_else(|_| defaults::HISTORY_SERVICE_URL.to_string()),
            vaults: std::env::var("VAULTS_SERVICE_URL")
                .unwrap_or_else(|_| defaults::VAULTS_SERVICE_URL.to_string()),
            rag: std::env::var("RAG_SERVICE_URL")
                .unwrap_or_else(|_| defaults::RAG_SERVICE_URL.to_string()),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            chats: defaults::CHATS_SERVICE_URL.to_string(),
            history: defaults::HISTORY_SERVICE_URL.to_string(),
            vaults: defaults::VAULTS_SERVICE_URL.to_string(),
            rag: defaults::RAG_SERVICE_URL.to_string(),
        }
    }
}
