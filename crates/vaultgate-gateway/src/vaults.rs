//! Vault lifecycle orchestrator.
//!
//! The heavy operation here is vault deletion: every chat referencing the
//! vault is deleted first, fanned out concurrently with first-failure-aborts
//! semantics. The vault record itself is only touched once all of its chats
//! are gone; on any chat failure the vault survives and the caller gets one
//! aggregate error. Chats already deleted by then are not restored.

use std::sync::Arc;

use tracing::{debug, error, info};
use uuid::Uuid;

use vaultgate_cache::VaultCache;
use vaultgate_core::{
    CreateVaultRequest, DocumentRecord, DocumentUpload, Error, Result, VaultPreview, VaultRecord,
    VaultsBackend,
};

use crate::fanout::abort_on_first_failure;
use crate::messaging::MessagingService;

/// Orchestrates vault and document operations, including the cross-service
/// deletion fan-out.
pub struct VaultService {
    vaults: Arc<dyn VaultsBackend>,
    cache: VaultCache,
    messaging: Arc<MessagingService>,
}

impl VaultService {
    pub fn new(
        vaults: Arc<dyn VaultsBackend>,
        cache: VaultCache,
        messaging: Arc<MessagingService>,
    ) -> Self {
        Self {
            vaults,
            cache,
            messaging,
        }
    }

    /// Create a vault with its initial documents.
    pub async fn create_vault(
        &self,
        req: &CreateVaultRequest,
        files: &[DocumentUpload],
    ) -> Result<VaultRecord> {
        let vault = self.vaults.create_vault(req, files).await?;

        self.cache.set_vault(&vault).await;
        self.cache.delete_previews(req.user_id).await;
        info!(vault_id = %vault.vault_id, user_id = %req.user_id, "Vault created");
        Ok(vault)
    }

    /// Fetch one vault, cache-aside.
    pub async fn get_vault(&self, vault_id: Uuid) -> Result<VaultRecord> {
        if let Some(vault) = self.cache.get_vault(vault_id).await {
            debug!(vault_id = %vault_id, "Vault cache hit");
            return Ok(vault);
        }

        let vault = self.vaults.vault_by_id(vault_id).await?;
        self.cache.set_vault(&vault).await;
        Ok(vault)
    }

    /// List a user's vaults in preview shape, cache-aside.
    pub async fn get_user_vaults(&self, user_id: Uuid) -> Result<Vec<VaultPreview>> {
        if let Some(previews) = self.cache.get_previews(user_id).await {
            debug!(user_id = %user_id, "Vault previews cache hit");
            return Ok(previews);
        }

        let previews = self.vaults.vaults_by_user(user_id).await?;
        self.cache.set_previews(user_id, &previews).await;
        Ok(previews)
    }

    /// List a vault's documents, cache-aside.
    pub async fn get_vault_documents(&self, vault_id: Uuid) -> Result<Vec<DocumentRecord>> {
        if let Some(documents) = self.cache.get_documents(vault_id).await {
            debug!(vault_id = %vault_id, "Documents cache hit");
            return Ok(documents);
        }

        let documents = self.vaults.vault_documents(vault_id).await?;
        self.cache.set_documents(vault_id, &documents).await;
        Ok(documents)
    }

    /// Fetch one document, cache-aside.
    pub async fn get_document(&self, document_id: Uuid) -> Result<DocumentRecord> {
        if let Some(document) = self.cache.get_document(document_id).await {
            debug!(document_id = %document_id, "Document cache hit");
            return Ok(document);
        }

        let document = self.vaults.document_by_id(document_id).await?;
        self.cache.set_document(&document).await;
        Ok(document)
    }

    /// Rename a vault and invalidate the entries carrying the old name.
    pub async fn rename_vault(&self, user_id: Uuid, vault_id: Uuid, name: &str) -> Result<()> {
        self.vaults.rename_vault(vault_id, name).await?;
        self.cache.delete_vault(vault_id).await;
        self.cache.delete_previews(user_id).await;
        Ok(())
    }

    /// Upload a document into an existing vault.
    ///
    /// The vault service returns the updated vault, which replaces the cached
    /// record directly; the document-list entry is stale and dropped.
    pub async fn add_document(&self, vault_id: Uuid, file: &DocumentUpload) -> Result<VaultRecord> {
        let vault = self.vaults.add_document(vault_id, file).await?;
        self.cache.set_vault(&vault).await;
        self.cache.delete_documents(vault_id).await;
        Ok(vault)
    }

    /// Remove a document from a vault.
    pub async fn delete_document(&self, vault_id: Uuid, document_id: Uuid) -> Result<()> {
        self.vaults.delete_document(vault_id, document_id).await?;
        self.cache.delete_vault(vault_id).await;
        self.cache.delete_documents(vault_id).await;
        self.cache.delete_document(document_id).await;
        Ok(())
    }

    /// Delete a vault together with every chat referencing it.
    ///
    /// Chat deletions fan out concurrently; the first failure aborts the rest
    /// and the vault record is left in place. Chats deleted before the
    /// failure stay deleted.
    pub async fn delete_vault_and_chats(&self, user_id: Uuid, vault_id: Uuid) -> Result<()> {
        // Live read on purpose: a cached chat list could miss a chat created
        // since the last invalidation and leave it orphaned.
        let chats = self.messaging.get_chats_by_vault(vault_id).await?;
        let chat_count = chats.len();

        let deletions: Vec<_> = chats
            .into_iter()
            .map(|chat| {
                let messaging = self.messaging.clone();
                async move { messaging.delete_chat(user_id, chat.chat_id).await }
            })
            .collect();

        if let Err(e) = abort_on_first_failure(deletions).await {
            error!(
                vault_id = %vault_id,
                "Chat deletion fan-out failed, vault not deleted: {}",
                e
            );
            return Err(Error::Internal(format!(
                "failed to delete the chats of vault {}; the vault was not deleted: {}",
                vault_id, e
            )));
        }

        self.vaults.delete_vault(vault_id).await?;
        self.cache.delete_vault(vault_id).await;
        self.cache.delete_previews(user_id).await;
        self.cache.delete_documents(vault_id).await;
        info!(vault_id = %vault_id, chat_count, "Vault and its chats deleted");
        Ok(())
    }
}
