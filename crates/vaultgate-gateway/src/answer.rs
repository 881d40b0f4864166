//! Answer generation orchestrator.
//!
//! One request fans out to up to five downstream operations, and only the
//! answer backend call itself is fatal. Vault fetch, history fetch, and both
//! history appends are captured: their failures land in the aggregate
//! response's error slots while the answer still comes back.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use vaultgate_cache::ChatCache;
use vaultgate_core::tokenizer::truncate_history;
use vaultgate_core::{
    AggregatedAnswer, AnswerBackend, HistoryBackend, MessageRecord, Result, Tokenizer,
    VaultDispatch,
};

use crate::vaults::VaultService;

/// Orchestrates one answer-generation request across the vault, history, and
/// answer services.
pub struct AnswerService {
    vaults: Arc<VaultService>,
    history: Arc<dyn HistoryBackend>,
    graph: Arc<dyn AnswerBackend>,
    vector: Arc<dyn AnswerBackend>,
    chat_cache: ChatCache,
    tokenizer: Arc<dyn Tokenizer>,
    token_budget: usize,
}

impl AnswerService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        vaults: Arc<VaultService>,
        history: Arc<dyn HistoryBackend>,
        graph: Arc<dyn AnswerBackend>,
        vector: Arc<dyn AnswerBackend>,
        chat_cache: ChatCache,
        tokenizer: Arc<dyn Tokenizer>,
        token_budget: usize,
    ) -> Self {
        Self {
            vaults,
            history,
            graph,
            vector,
            chat_cache,
            tokenizer,
            token_budget,
        }
    }

    /// Generate an answer for `query` in the context of one chat.
    ///
    /// Vault and history are fetched concurrently, best-effort. A failed
    /// vault fetch dispatches to the graph backend with no vault id; a failed
    /// history fetch means the backend sees an empty context. The user
    /// message is appended before the backend call and the AI message after
    /// it, both captured.
    pub async fn generate(
        &self,
        chat_id: Uuid,
        vault_id: Uuid,
        query: &str,
    ) -> Result<AggregatedAnswer> {
        let (vault, history) = tokio::join!(
            self.vaults.get_vault(vault_id),
            self.history.history(chat_id)
        );

        let vault_error = vault.as_ref().err().map(|e| e.to_string());
        let history_error = history.as_ref().err().map(|e| e.to_string());
        if let Some(e) = &vault_error {
            warn!(chat_id = %chat_id, vault_id = %vault_id, "Vault fetch failed, dispatching without vault: {}", e);
        }
        if let Some(e) = &history_error {
            warn!(chat_id = %chat_id, "History fetch failed, answering without context: {}", e);
        }

        let user_message_error = self
            .history
            .add_user_message(chat_id, query)
            .await
            .err()
            .map(|e| e.to_string());
        if let Some(e) = &user_message_error {
            warn!(chat_id = %chat_id, "User message append failed: {}", e);
        }

        let messages = history
            .as_ref()
            .map(|h| h.messages.as_slice())
            .unwrap_or_default();
        let context = truncate_history(messages, self.tokenizer.as_ref(), self.token_budget);
        if context.len() < messages.len() {
            debug!(
                chat_id = %chat_id,
                kept_messages = context.len(),
                total = messages.len(),
                "History truncated to token budget"
            );
        }

        let dispatch = VaultDispatch::from_vault(vault.as_ref().ok());
        let (backend, backend_vault) = match dispatch {
            VaultDispatch::Unknown => (&self.graph, None),
            VaultDispatch::Graph => (&self.graph, Some(vault_id)),
            VaultDispatch::Vector => (&self.vector, Some(vault_id)),
        };
        debug!(chat_id = %chat_id, ?dispatch, "Answer backend selected");

        let answer = backend.answer(backend_vault, query, context).await?;

        let ai_message_error = self
            .history
            .add_ai_message(chat_id, &answer)
            .await
            .err()
            .map(|e| e.to_string());
        if let Some(e) = &ai_message_error {
            warn!(chat_id = %chat_id, "AI message append failed: {}", e);
        }

        // The cached merged chat now misses up to two messages. Only drop it
        // when the history fetch worked; a failed fetch proves nothing about
        // the cached copy.
        if history.is_ok() {
            self.chat_cache.delete_chat(chat_id).await;
        }

        Ok(AggregatedAnswer {
            ai_message: MessageRecord::ai(answer),
            history_error,
            vault_error,
            user_message_error,
            ai_message_error,
        })
    }
}
