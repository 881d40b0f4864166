//! Backend traits for the downstream service contracts.
//!
//! These traits define the JSON-over-HTTP boundary of each downstream
//! service, enabling pluggable transports and testability. The reqwest
//! clients in `vaultgate-client` implement them against real services; the
//! mock backends implement them for tests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

/// Chat service contract.
#[async_trait]
pub trait ChatsBackend: Send + Sync {
    /// Create a chat record. Does not create its history; the chat lifecycle
    /// orchestrator owns that saga.
    async fn create_chat(&self, req: &CreateChatRequest) -> Result<ChatRecord>;

    /// Delete a chat record.
    async fn delete_chat(&self, chat_id: Uuid) -> Result<()>;

    /// Rename a chat.
    async fn rename_chat(&self, chat_id: Uuid, name: &str) -> Result<()>;

    /// Archive or unarchive a chat.
    async fn set_archived(&self, chat_id: Uuid, archived: bool) -> Result<()>;

    /// List a user's chats, filtered by archived state.
    async fn chats_by_user(&self, user_id: Uuid, archived: bool) -> Result<Vec<ChatRecord>>;

    /// List every chat referencing a vault, regardless of archived state.
    async fn chats_by_vault(&self, vault_id: Uuid) -> Result<Vec<ChatRecord>>;

    /// Fetch one chat's metadata (no history).
    async fn chat_by_id(&self, chat_id: Uuid) -> Result<ChatRecord>;
}

/// History service contract.
#[async_trait]
pub trait HistoryBackend: Send + Sync {
    /// Create an empty history for a chat.
    async fn create_history(&self, chat_id: Uuid) -> Result<()>;

    /// Delete a chat's history.
    async fn delete_history(&self, chat_id: Uuid) -> Result<()>;

    /// Remove all messages but keep the history record.
    async fn clear_history(&self, chat_id: Uuid) -> Result<()>;

    /// Append a user-authored message.
    async fn add_user_message(&self, chat_id: Uuid, content: &str) -> Result<()>;

    /// Append an AI-authored message with its traceback.
    async fn add_ai_message(&self, chat_id: Uuid, message: &AiMessage) -> Result<()>;

    /// Fetch the ordered message list for a chat.
    async fn history(&self, chat_id: Uuid) -> Result<HistoryRecord>;
}

/// Vault service contract.
#[async_trait]
pub trait VaultsBackend: Send + Sync {
    /// Create a vault with its initial documents.
    async fn create_vault(
        &self,
        req: &CreateVaultRequest,
        files: &[DocumentUpload],
    ) -> Result<VaultRecord>;

    /// Fetch one vault with document summaries.
    async fn vault_by_id(&self, vault_id: Uuid) -> Result<VaultRecord>;

    /// List a user's vaults in preview shape.
    async fn vaults_by_user(&self, user_id: Uuid) -> Result<Vec<VaultPreview>>;

    /// Delete a vault.
    async fn delete_vault(&self, vault_id: Uuid) -> Result<()>;

    /// Rename a vault.
    async fn rename_vault(&self, vault_id: Uuid, name: &str) -> Result<()>;

    /// Upload one document into an existing vault; returns the updated vault.
    async fn add_document(&self, vault_id: Uuid, file: &DocumentUpload) -> Result<VaultRecord>;

    /// Remove a document from a vault.
    async fn delete_document(&self, vault_id: Uuid, document_id: Uuid) -> Result<()>;

    /// List a vault's documents.
    async fn vault_documents(&self, vault_id: Uuid) -> Result<Vec<DocumentRecord>>;

    /// Fetch one document.
    async fn document_by_id(&self, document_id: Uuid) -> Result<DocumentRecord>;
}

/// Answer-generation backend contract.
///
/// Two instances exist per process, one per retrieval strategy; the answer
/// orchestrator picks between them by vault dispatch tag.
#[async_trait]
pub trait AnswerBackend: Send + Sync {
    /// Generate an answer for a query given the (possibly absent) vault and
    /// the truncated chat history.
    async fn answer(
        &self,
        vault_id: Option<Uuid>,
        query: &str,
        history: &[MessageRecord],
    ) -> Result<AiMessage>;
}
