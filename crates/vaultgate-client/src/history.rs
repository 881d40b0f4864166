//! HTTP client for the history service.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use uuid::Uuid;

use vaultgate_core::{AiMessage, HistoryBackend, HistoryRecord, Result};

use crate::http::ServiceClient;

/// History service client speaking the JSON-over-HTTP contract.
#[derive(Clone)]
pub struct HttpHistoryClient {
    http: ServiceClient,
}

#[derive(Serialize)]
struct ChatCredentials {
    chat_id: Uuid,
}

#[derive(Serialize)]
struct AddUserMessage<'a> {
    chat_id: Uuid,
    content: &'a str,
}

#[derive(Serialize)]
struct AddAiMessage<'a> {
    chat_id: Uuid,
    message: &'a AiMessage,
}

impl HttpHistoryClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http: ServiceClient::new(client, "History", base_url),
        }
    }
}

#[async_trait]
impl HistoryBackend for HttpHistoryClient {
    async fn create_history(&self, chat_id: Uuid) -> Result<()> {
        self.http
            .call_unit(Method::POST, "/create_history", &ChatCredentials { chat_id })
            .await
    }

    async fn delete_history(&self, chat_id: Uuid) -> Result<()> {
        self.http
            .call_unit(Method::POST, "/delete_history", &ChatCredentials { chat_id })
            .await
    }

    async fn clear_history(&self, chat_id: Uuid) -> Result<()> {
        self.http
            .call_unit(Method::POST, "/clear_history", &ChatCredentials { chat_id })
            .await
    }

    async fn add_user_message(&self, chat_id: Uuid, content: &str) -> Result<()> {
        self.http
            .call_unit(
                Method::POST,
                "/add_user_message",
                &AddUserMessage { chat_id, content },
            )
            .await
    }

    async fn add_ai_message(&self, chat_id: Uuid, message: &AiMessage) -> Result<()> {
        self.http
            .call_unit(
                Method::POST,
                "/add_ai_message",
                &AddAiMessage { chat_id, message },
            )
            .await
    }

    async fn history(&self, chat_id: Uuid) -> Result<HistoryRecord> {
        self.http
            .call(Method::POST, "/get_history", &ChatCredentials { chat_id })
            .await
    }
}
