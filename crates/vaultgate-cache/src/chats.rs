//! Typed cache manager for chat entities.
//!
//! Key scheme: `messaging:chat:{chat_id}` for single records and
//! `messaging:chats:{owner_id}:{archived}` for collections. The owner of a
//! collection may be a user id or a vault id; invalidation drops every
//! archived-flag variant for an owner with one prefix delete.

use tracing::warn;
use uuid::Uuid;

use vaultgate_core::defaults::CHAT_NAMESPACE;
use vaultgate_core::models::ChatRecord;

use crate::store::KeyValueCache;

/// Cache manager for chat records and chat collections.
#[derive(Clone)]
pub struct ChatCache {
    kv: KeyValueCache,
}

impl ChatCache {
    pub fn new(kv: KeyValueCache) -> Self {
        Self { kv }
    }

    fn chat_key(chat_id: Uuid) -> String {
        format!("{}:chat:{}", CHAT_NAMESPACE, chat_id.simple())
    }

    fn chats_key(owner_id: Uuid, archived: bool) -> String {
        format!("{}:chats:{}:{}", CHAT_NAMESPACE, owner_id.simple(), archived)
    }

    fn chats_prefix(owner_id: Uuid) -> String {
        format!("{}:chats:{}:", CHAT_NAMESPACE, owner_id.simple())
    }

    /// Fetch a cached chat record. Corrupt entries degrade to a miss.
    pub async fn get_chat(&self, chat_id: Uuid) -> Option<ChatRecord> {
        let raw = self.kv.get(&Self::chat_key(chat_id)).await?;
        match serde_json::from_str(&raw) {
            Ok(chat) => Some(chat),
            Err(e) => {
                warn!(chat_id = %chat_id, "Dropping corrupt chat cache entry: {}", e);
                None
            }
        }
    }

    /// Cache a chat record.
    pub async fn set_chat(&self, chat: &ChatRecord) -> bool {
        match serde_json::to_string(chat) {
            Ok(raw) => self.kv.set(&Self::chat_key(chat.chat_id), &raw).await,
            Err(e) => {
                warn!(chat_id = %chat.chat_id, "Chat cache serialization error: {}", e);
                false
            }
        }
    }

    /// Invalidate a chat's single-item entry.
    pub async fn delete_chat(&self, chat_id: Uuid) -> bool {
        self.kv.delete(&Self::chat_key(chat_id)).await
    }

    /// Fetch a cached collection for an owner (user or vault) and archived flag.
    pub async fn get_chats(&self, owner_id: Uuid, archived: bool) -> Option<Vec<ChatRecord>> {
        let raw = self.kv.get(&Self::chats_key(owner_id, archived)).await?;
        match serde_json::from_str(&raw) {
            Ok(chats) => Some(chats),
            Err(e) => {
                warn!(owner_id = %owner_id, "Dropping corrupt chats cache entry: {}", e);
                None
            }
        }
    }

    /// Cache a collection for an owner and archived flag.
    pub async fn set_chats(&self, owner_id: Uuid, archived: bool, chats: &[ChatRecord]) -> bool {
        match serde_json::to_string(chats) {
            Ok(raw) => self.kv.set(&Self::chats_key(owner_id, archived), &raw).await,
            Err(e) => {
                warn!(owner_id = %owner_id, "Chats cache serialization error: {}", e);
                false
            }
        }
    }

    /// Drop both archived-flag collection variants for an owner.
    pub async fn invalidate_collections(&self, owner_id: Uuid) -> bool {
        self.kv.delete_by_prefix(&Self::chats_prefix(owner_id)).await
    }
}
