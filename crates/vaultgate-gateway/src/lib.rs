//! # vaultgate-gateway
//!
//! Orchestration core of the vaultgate API gateway: the chat lifecycle,
//! vault lifecycle, and answer-generation orchestrators, plus the fan-out
//! join helpers they share. An HTTP routing layer sits in front of this
//! crate and downstream services sit behind it; neither lives here.

pub mod answer;
pub mod fanout;
pub mod messaging;
pub mod vaults;

pub use answer::AnswerService;
pub use messaging::MessagingService;
pub use vaults::VaultService;

use std::sync::Arc;

use vaultgate_cache::{ChatCache, KeyValueCache, VaultCache};
use vaultgate_client::{
    Endpoints, HttpAnswerClient, HttpChatsClient, HttpHistoryClient, HttpVaultsClient,
};
use vaultgate_core::{defaults, HistoryBackend, Result, TiktokenTokenizer};

/// The three orchestrators wired against the real downstream services.
pub struct Gateway {
    pub messaging: Arc<MessagingService>,
    pub vaults: Arc<VaultService>,
    pub answer: Arc<AnswerService>,
}

impl Gateway {
    /// Assemble the gateway from environment configuration.
    ///
    /// Service URLs and cache settings come from the environment; a missing
    /// Redis only disables caching, but a tokenizer initialization failure is
    /// fatal.
    pub async fn from_env() -> Result<Self> {
        let endpoints = Endpoints::from_env();
        let http = reqwest::Client::new();
        let kv = KeyValueCache::from_env().await;

        let history: Arc<dyn HistoryBackend> =
            Arc::new(HttpHistoryClient::new(http.clone(), endpoints.history));

        let messaging = Arc::new(MessagingService::new(
            Arc::new(HttpChatsClient::new(http.clone(), endpoints.chats)),
            history.clone(),
            ChatCache::new(kv.clone()),
        ));

        let vaults = Arc::new(VaultService::new(
            Arc::new(HttpVaultsClient::new(http.clone(), endpoints.vaults)),
            VaultCache::new(kv.clone()),
            messaging.clone(),
        ));

        let answer = Arc::new(AnswerService::new(
            vaults.clone(),
            history,
            Arc::new(HttpAnswerClient::graph(http.clone(), endpoints.rag.clone())),
            Arc::new(HttpAnswerClient::vector(http, endpoints.rag)),
            ChatCache::new(kv),
            Arc::new(TiktokenTokenizer::cl100k()?),
            history_token_budget(),
        ));

        Ok(Self {
            messaging,
            vaults,
            answer,
        })
    }
}

/// History token budget from `VAULTGATE_HISTORY_TOKEN_BUDGET`, defaulting to
/// the built-in budget.
pub fn history_token_budget() -> usize {
    std::env::var("VAULTGATE_HISTORY_TOKEN_BUDGET")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults::HISTORY_TOKEN_BUDGET)
}
