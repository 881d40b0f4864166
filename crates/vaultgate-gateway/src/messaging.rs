//! Chat lifecycle orchestrator.
//!
//! A chat and its history live in two different downstream services; every
//! lifecycle operation here is a small saga keeping them paired. Compensation
//! is best-effort: when undo itself fails the inconsistency is logged at ERROR
//! and the original failure is surfaced, never the compensation failure.

use std::sync::Arc;

use tracing::{debug, error, info};
use uuid::Uuid;

use vaultgate_cache::ChatCache;
use vaultgate_core::{ChatRecord, ChatsBackend, CreateChatRequest, HistoryBackend, Result};

/// Orchestrates chat + history operations across the two owning services.
pub struct MessagingService {
    chats: Arc<dyn ChatsBackend>,
    history: Arc<dyn HistoryBackend>,
    cache: ChatCache,
}

impl MessagingService {
    pub fn new(
        chats: Arc<dyn ChatsBackend>,
        history: Arc<dyn HistoryBackend>,
        cache: ChatCache,
    ) -> Self {
        Self {
            chats,
            history,
            cache,
        }
    }

    /// Create a chat and its empty history.
    ///
    /// Saga: chat record first, then history. If the history step fails the
    /// chat record is deleted again so no chat exists without a history.
    pub async fn create_chat(&self, req: &CreateChatRequest) -> Result<ChatRecord> {
        let chat = self.chats.create_chat(req).await?;

        if let Err(e) = self.history.create_history(chat.chat_id).await {
            if let Err(undo) = self.chats.delete_chat(chat.chat_id).await {
                error!(
                    chat_id = %chat.chat_id,
                    "Chat creation rollback failed, orphan chat record remains: {}",
                    undo
                );
            }
            return Err(e);
        }

        self.cache.set_chat(&chat).await;
        self.cache.invalidate_collections(req.user_id).await;
        info!(chat_id = %chat.chat_id, user_id = %req.user_id, "Chat created");
        Ok(chat)
    }

    /// Delete a chat and its history.
    ///
    /// Saga: history first, then the chat record. If the chat step fails an
    /// empty history is re-created so the pairing invariant holds (messages
    /// are not restored).
    pub async fn delete_chat(&self, user_id: Uuid, chat_id: Uuid) -> Result<()> {
        self.history.delete_history(chat_id).await?;

        if let Err(e) = self.chats.delete_chat(chat_id).await {
            if let Err(undo) = self.history.create_history(chat_id).await {
                error!(
                    chat_id = %chat_id,
                    "Chat deletion rollback failed, chat record has no history: {}",
                    undo
                );
            }
            return Err(e);
        }

        self.cache.delete_chat(chat_id).await;
        self.cache.invalidate_collections(user_id).await;
        info!(chat_id = %chat_id, user_id = %user_id, "Chat deleted");
        Ok(())
    }

    /// Fetch one chat merged with its history, cache-aside.
    pub async fn get_chat(&self, chat_id: Uuid) -> Result<ChatRecord> {
        if let Some(chat) = self.cache.get_chat(chat_id).await {
            debug!(chat_id = %chat_id, "Chat cache hit");
            return Ok(chat);
        }

        let (mut chat, history) =
            tokio::try_join!(self.chats.chat_by_id(chat_id), self.history.history(chat_id))?;
        chat.history = Some(history);

        self.cache.set_chat(&chat).await;
        Ok(chat)
    }

    /// List a user's chats filtered by archived state, cache-aside.
    pub async fn get_chats_by_user(
        &self,
        user_id: Uuid,
        archived: bool,
    ) -> Result<Vec<ChatRecord>> {
        if let Some(chats) = self.cache.get_chats(user_id, archived).await {
            debug!(user_id = %user_id, archived, "Chats cache hit");
            return Ok(chats);
        }

        let chats = self.chats.chats_by_user(user_id, archived).await?;
        self.cache.set_chats(user_id, archived, &chats).await;
        Ok(chats)
    }

    /// List every chat referencing a vault. Deliberately un-cached: this is
    /// the read that feeds vault deletion, which must see the live set.
    pub async fn get_chats_by_vault(&self, vault_id: Uuid) -> Result<Vec<ChatRecord>> {
        self.chats.chats_by_vault(vault_id).await
    }

    /// Rename a chat and drop every cache entry that carries the old name.
    pub async fn rename_chat(&self, user_id: Uuid, chat_id: Uuid, name: &str) -> Result<()> {
        self.chats.rename_chat(chat_id, name).await?;
        self.cache.delete_chat(chat_id).await;
        self.cache.invalidate_collections(user_id).await;
        Ok(())
    }

    /// Archive or unarchive a chat. Both collection variants are invalidated
    /// since the chat moves between them.
    pub async fn set_archive_status(
        &self,
        user_id: Uuid,
        chat_id: Uuid,
        archived: bool,
    ) -> Result<()> {
        self.chats.set_archived(chat_id, archived).await?;
        self.cache.delete_chat(chat_id).await;
        self.cache.invalidate_collections(user_id).await;
        Ok(())
    }

    /// Remove all messages from a chat's history.
    pub async fn clear_history(&self, chat_id: Uuid) -> Result<()> {
        self.history.clear_history(chat_id).await?;
        self.cache.delete_chat(chat_id).await;
        Ok(())
    }
}
