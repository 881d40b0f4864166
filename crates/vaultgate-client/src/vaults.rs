//! HTTP client for the vault service.
//!
//! Vault creation and document upload carry file content as multipart forms
//! with a longer timeout than ordinary calls.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

use vaultgate_core::{
    defaults, CreateVaultRequest, DocumentRecord, DocumentUpload, Error, Result, VaultPreview,
    VaultRecord, VaultsBackend,
};

use crate::http::ServiceClient;

/// Vault service client speaking the JSON-over-HTTP contract.
#[derive(Clone)]
pub struct HttpVaultsClient {
    http: ServiceClient,
}

#[derive(Serialize)]
struct VaultCredentials {
    vault_id: Uuid,
}

#[derive(Serialize)]
struct RenameVault {
    vault_id: Uuid,
    name: String,
}

#[derive(Serialize)]
struct UserCredentials {
    user_id: Uuid,
}

#[derive(Serialize)]
struct DocumentCredentials {
    vault_id: Uuid,
    document_id: Uuid,
}

#[derive(Serialize)]
struct DocumentLookup {
    document_id: Uuid,
}

impl HttpVaultsClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http: ServiceClient::new(client, "Vault", base_url),
        }
    }

    fn file_part(file: &DocumentUpload) -> Part {
        Part::bytes(file.content.clone()).file_name(file.file_name.clone())
    }
}

#[async_trait]
impl VaultsBackend for HttpVaultsClient {
    async fn create_vault(
        &self,
        req: &CreateVaultRequest,
        files: &[DocumentUpload],
    ) -> Result<VaultRecord> {
        let credentials = serde_json::to_string(req)
            .map_err(|e| Error::Internal(format!("vault request serialization failed: {}", e)))?;

        let mut form = Form::new().text("credentials", credentials);
        for file in files {
            form = form.part("files", Self::file_part(file));
        }

        self.http
            .post_multipart(
                "/create_vault",
                form,
                Duration::from_secs(defaults::UPLOAD_TIMEOUT_SECS),
            )
            .await
    }

    async fn vault_by_id(&self, vault_id: Uuid) -> Result<VaultRecord> {
        self.http
            .call(Method::POST, "/get_vault_by_id", &VaultCredentials { vault_id })
            .await
    }

    async fn vaults_by_user(&self, user_id: Uuid) -> Result<Vec<VaultPreview>> {
        self.http
            .call(Method::POST, "/get_users_vaults", &UserCredentials { user_id })
            .await
    }

    async fn delete_vault(&self, vault_id: Uuid) -> Result<()> {
        self.http
            .call_unit(Method::POST, "/delete_vault", &VaultCredentials { vault_id })
            .await
    }

    async fn rename_vault(&self, vault_id: Uuid, name: &str) -> Result<()> {
        self.http
            .call_unit(
                Method::POST,
                "/rename_vault",
                &RenameVault {
                    vault_id,
                    name: name.to_string(),
                },
            )
            .await
    }

    async fn add_document(&self, vault_id: Uuid, file: &DocumentUpload) -> Result<VaultRecord> {
        let form = Form::new()
            .text("vault_id", vault_id.to_string())
            .part("file", Self::file_part(file));

        self.http
            .post_multipart(
                "/add_document",
                form,
                Duration::from_secs(defaults::UPLOAD_TIMEOUT_SECS),
            )
            .await
    }

    async fn delete_document(&self, vault_id: Uuid, document_id: Uuid) -> Result<()> {
        self.http
            .call_unit(
                Method::POST,
                "/delete_document",
                &DocumentCredentials {
                    vault_id,
                    document_id,
                },
            )
            .await
    }

    async fn vault_documents(&self, vault_id: Uuid) -> Result<Vec<DocumentRecord>> {
        self.http
            .call(
                Method::POST,
                "/get_vault_documents",
                &VaultCredentials { vault_id },
            )
            .await
    }

    async fn document_by_id(&self, document_id: Uuid) -> Result<DocumentRecord> {
        self.http
            .call(
                Method::POST,
                "/get_document_by_id",
                &DocumentLookup { document_id },
            )
            .await
    }
}
