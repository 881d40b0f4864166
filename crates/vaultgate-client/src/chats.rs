//! HTTP client for the chat service.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use uuid::Uuid;

use vaultgate_core::{ChatRecord, ChatsBackend, CreateChatRequest, Result};

use crate::http::ServiceClient;

/// Chat service client speaking the JSON-over-HTTP contract.
#[derive(Clone)]
pub struct HttpChatsClient {
    http: ServiceClient,
}

#[derive(Serialize)]
struct ChatCredentials {
    chat_id: Uuid,
}

#[derive(Serialize)]
struct RenameChat {
    chat_id: Uuid,
    name: String,
}

#[derive(Serialize)]
struct UserCredentials {
    user_id: Uuid,
}

#[derive(Serialize)]
struct VaultCredentials {
    vault_id: Uuid,
}

impl HttpChatsClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http: ServiceClient::new(client, "Chat", base_url),
        }
    }
}

#[async_trait]
impl ChatsBackend for HttpChatsClient {
    async fn create_chat(&self, req: &CreateChatRequest) -> Result<ChatRecord> {
        self.http.call(Method::POST, "/create_chat", req).await
    }

    async fn delete_chat(&self, chat_id: Uuid) -> Result<()> {
        self.http
            .call_unit(Method::POST, "/delete_chat", &ChatCredentials { chat_id })
            .await
    }

    async fn rename_chat(&self, chat_id: Uuid, name: &str) -> Result<()> {
        self.http
            .call_unit(
                Method::POST,
                "/set_chat_name",
                &RenameChat {
                    chat_id,
                    name: name.to_string(),
                },
            )
            .await
    }

    async fn set_archived(&self, chat_id: Uuid, archived: bool) -> Result<()> {
        let endpoint = if archived {
            "/archive_chat"
        } else {
            "/unarchive_chat"
        };
        self.http
            .call_unit(Method::POST, endpoint, &ChatCredentials { chat_id })
            .await
    }

    async fn chats_by_user(&self, user_id: Uuid, archived: bool) -> Result<Vec<ChatRecord>> {
        let endpoint = if archived {
            "/get_user_archived_chats"
        } else {
            "/get_user_chats"
        };
        self.http
            .call(Method::POST, endpoint, &UserCredentials { user_id })
            .await
    }

    async fn chats_by_vault(&self, vault_id: Uuid) -> Result<Vec<ChatRecord>> {
        self.http
            .call(Method::POST, "/get_vault_chats", &VaultCredentials { vault_id })
            .await
    }

    async fn chat_by_id(&self, chat_id: Uuid) -> Result<ChatRecord> {
        self.http
            .call(Method::POST, "/get_chat_by_id", &ChatCredentials { chat_id })
            .await
    }
}
