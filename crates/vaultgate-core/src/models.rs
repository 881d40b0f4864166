//! Core data models for vaultgate.
//!
//! These are the wire shapes shared with the downstream chat, history, vault,
//! and answer-generation services, plus the gateway's own aggregate response
//! types. Cache values are the canonical JSON serialization of these types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// CHAT TYPES
// =============================================================================

/// A chat as stored by the downstream chat service.
///
/// The gateway only ever holds a cached copy; the chat service owns the record.
/// `history` is populated by the merged read path and absent on list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRecord {
    pub chat_id: Uuid,
    pub vault_id: Uuid,
    pub name: String,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<HistoryRecord>,
}

/// Request to create a chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChatRequest {
    pub user_id: Uuid,
    pub vault_id: Uuid,
    pub name: String,
}

// =============================================================================
// HISTORY TYPES
// =============================================================================

/// Message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Ai,
}

/// A supporting source reference attached to an AI message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracebackUnit {
    pub document_id: Uuid,
    pub document_name: String,
    pub information: String,
}

/// One entry in a chat history.
///
/// User messages carry an empty traceback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traceback: Vec<TracebackUnit>,
}

impl MessageRecord {
    /// Build a user-authored entry.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            traceback: Vec::new(),
        }
    }

    /// Build an AI-authored entry from an answer backend response.
    pub fn ai(answer: AiMessage) -> Self {
        Self {
            role: MessageRole::Ai,
            content: answer.content,
            traceback: answer.traceback,
        }
    }
}

/// Ordered message sequence for one chat, as returned by the history service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub chat_id: Uuid,
    pub messages: Vec<MessageRecord>,
}

// =============================================================================
// VAULT TYPES
// =============================================================================

/// Retrieval strategy of a vault. Immutable after creation; selects the
/// answer-generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaultKind {
    Graph,
    Vector,
}

/// A document vault with its document summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultRecord {
    pub vault_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub kind: VaultKind,
    pub created_at: DateTime<Utc>,
    pub documents: Vec<DocumentSummary>,
}

/// Preview shape for vault listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultPreview {
    pub vault_id: Uuid,
    pub name: String,
    pub kind: VaultKind,
}

/// Document summary carried inside a vault record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub document_id: Uuid,
    pub name: String,
}

/// Full document as stored by the vault service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub document_id: Uuid,
    pub vault_id: Uuid,
    pub name: String,
    pub text: String,
}

/// File content uploaded alongside a vault-service request.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content: Vec<u8>,
}

/// Request to create a vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVaultRequest {
    pub user_id: Uuid,
    pub name: String,
    pub kind: VaultKind,
}

// =============================================================================
// ANSWER GENERATION TYPES
// =============================================================================

/// Response of an answer-generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiMessage {
    pub content: String,
    #[serde(default)]
    pub traceback: Vec<TracebackUnit>,
}

/// Which answer-generation backend a request dispatches to.
///
/// A failed or absent vault fetch maps deliberately to `Unknown`, which takes
/// the graph path. Keeping the absent case as its own tag makes the dispatch
/// exhaustive instead of hiding it behind a null check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultDispatch {
    Unknown,
    Graph,
    Vector,
}

impl VaultDispatch {
    pub fn from_vault(vault: Option<&VaultRecord>) -> Self {
        match vault.map(|v| v.kind) {
            None => VaultDispatch::Unknown,
            Some(VaultKind::Graph) => VaultDispatch::Graph,
            Some(VaultKind::Vector) => VaultDispatch::Vector,
        }
    }
}

/// Aggregated result of one answer-generation request.
///
/// The request succeeds as long as the backend call itself succeeds; every
/// other sub-operation failure is captured in its own slot instead of being
/// raised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedAnswer {
    pub ai_message: MessageRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_message_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_message_error: Option<String>,
}
