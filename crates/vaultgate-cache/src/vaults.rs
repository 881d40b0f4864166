//! Typed cache manager for vault and document entities.
//!
//! Key scheme: `vaults:vault:{vault_id}`, `vaults:vaults:{user_id}` (preview
//! collection), `vaults:documents:{vault_id}`, `vaults:document:{document_id}`.

use tracing::warn;
use uuid::Uuid;

use vaultgate_core::defaults::VAULT_NAMESPACE;
use vaultgate_core::models::{DocumentRecord, VaultPreview, VaultRecord};

use crate::store::KeyValueCache;

/// Cache manager for vault records, vault previews, and documents.
#[derive(Clone)]
pub struct VaultCache {
    kv: KeyValueCache,
}

impl VaultCache {
    pub fn new(kv: KeyValueCache) -> Self {
        Self { kv }
    }

    fn vault_key(vault_id: Uuid) -> String {
        format!("{}:vault:{}", VAULT_NAMESPACE, vault_id.simple())
    }

    fn previews_key(user_id: Uuid) -> String {
        format!("{}:vaults:{}", VAULT_NAMESPACE, user_id.simple())
    }

    fn documents_key(vault_id: Uuid) -> String {
        format!("{}:documents:{}", VAULT_NAMESPACE, vault_id.simple())
    }

    fn document_key(document_id: Uuid) -> String {
        format!("{}:document:{}", VAULT_NAMESPACE, document_id.simple())
    }

    pub async fn get_vault(&self, vault_id: Uuid) -> Option<VaultRecord> {
        let raw = self.kv.get(&Self::vault_key(vault_id)).await?;
        match serde_json::from_str(&raw) {
            Ok(vault) => Some(vault),
            Err(e) => {
                warn!(vault_id = %vault_id, "Dropping corrupt vault cache entry: {}", e);
                None
            }
        }
    }

    pub async fn set_vault(&self, vault: &VaultRecord) -> bool {
        match serde_json::to_string(vault) {
            Ok(raw) => self.kv.set(&Self::vault_key(vault.vault_id), &raw).await,
            Err(e) => {
                warn!(vault_id = %vault.vault_id, "Vault cache serialization error: {}", e);
                false
            }
        }
    }

    pub async fn delete_vault(&self, vault_id: Uuid) -> bool {
        self.kv.delete(&Self::vault_key(vault_id)).await
    }

    pub async fn get_previews(&self, user_id: Uuid) -> Option<Vec<VaultPreview>> {
        let raw = self.kv.get(&Self::previews_key(user_id)).await?;
        serde_json::from_str(&raw).ok()
    }

    pub async fn set_previews(&self, user_id: Uuid, previews: &[VaultPreview]) -> bool {
        match serde_json::to_string(previews) {
            Ok(raw) => self.kv.set(&Self::previews_key(user_id), &raw).await,
            Err(e) => {
                warn!(user_id = %user_id, "Previews cache serialization error: {}", e);
                false
            }
        }
    }

    pub async fn delete_previews(&self, user_id: Uuid) -> bool {
        self.kv.delete(&Self::previews_key(user_id)).await
    }

    pub async fn get_documents(&self, vault_id: Uuid) -> Option<Vec<DocumentRecord>> {
        let raw = self.kv.get(&Self::documents_key(vault_id)).await?;
        serde_json::from_str(&raw).ok()
    }

    pub async fn set_documents(&self, vault_id: Uuid, documents: &[DocumentRecord]) -> bool {
        match serde_json::to_string(documents) {
            Ok(raw) => self.kv.set(&Self::documents_key(vault_id), &raw).await,
            Err(e) => {
                warn!(vault_id = %vault_id, "Documents cache serialization error: {}", e);
                false
            }
        }
    }

    pub async fn delete_documents(&self, vault_id: Uuid) -> bool {
        self.kv.delete(&Self::documents_key(vault_id)).await
    }

    pub async fn get_document(&self, document_id: Uuid) -> Option<DocumentRecord> {
        let raw = self.kv.get(&Self::document_key(document_id)).await?;
        serde_json::from_str(&raw).ok()
    }

    pub async fn set_document(&self, document: &DocumentRecord) -> bool {
        match serde_json::to_string(document) {
            Ok(raw) => self.kv.set(&Self::document_key(document.document_id), &raw).await,
            Err(e) => {
                warn!(document_id = %document.document_id, "Document cache serialization error: {}", e);
                false
            }
        }
    }

    pub async fn delete_document(&self, document_id: Uuid) -> bool {
        self.kv.delete(&Self::document_key(document_id)).await
    }
}
