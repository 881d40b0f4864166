//! In-process mock backends for deterministic testing.
//!
//! Each mock keeps its records in memory, logs every call by operation name,
//! and can be scripted to fail a specific operation with a specific error.
//! Orchestrator tests assert on both the returned values and the call logs to
//! verify ordering and compensation behavior.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use vaultgate_core::{
    AiMessage, AnswerBackend, ChatRecord, ChatsBackend, CreateChatRequest, CreateVaultRequest,
    DocumentRecord, DocumentSummary, DocumentUpload, Error, HistoryBackend, HistoryRecord,
    MessageRecord, Result, VaultPreview, VaultRecord, VaultsBackend,
};

/// Call log plus scripted failures, shared by all mocks.
#[derive(Default)]
struct Script {
    calls: Vec<String>,
    failures: HashMap<String, Error>,
}

impl Script {
    /// Record the call and return the scripted failure for `op`, if any.
    fn check(&mut self, op: &str) -> Result<()> {
        self.calls.push(op.to_string());
        match self.failures.get(op) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

macro_rules! script_accessors {
    () => {
        /// Script `op` to fail with `error` on every call.
        pub fn fail_on(&self, op: &str, error: Error) {
            self.script.lock().unwrap().failures.insert(op.to_string(), error);
        }

        /// Clear a scripted failure.
        pub fn recover(&self, op: &str) {
            self.script.lock().unwrap().failures.remove(op);
        }

        /// All operations invoked so far, in order.
        pub fn calls(&self) -> Vec<String> {
            self.script.lock().unwrap().calls.clone()
        }

        /// Number of invocations of one operation.
        pub fn call_count(&self, op: &str) -> usize {
            self.script
                .lock()
                .unwrap()
                .calls
                .iter()
                .filter(|c| c.as_str() == op)
                .count()
        }
    };
}

// =============================================================================
// CHAT SERVICE MOCK
// =============================================================================

/// Mock chat service backed by an in-memory map.
#[derive(Clone, Default)]
pub struct MockChats {
    script: Arc<Mutex<Script>>,
    chats: Arc<Mutex<HashMap<Uuid, (Uuid, ChatRecord)>>>,
}

impl MockChats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a chat record owned by `user_id`.
    pub fn seed(&self, user_id: Uuid, chat: ChatRecord) {
        self.chats
            .lock()
            .unwrap()
            .insert(chat.chat_id, (user_id, chat));
    }

    /// Whether a chat record currently exists.
    pub fn contains(&self, chat_id: Uuid) -> bool {
        self.chats.lock().unwrap().contains_key(&chat_id)
    }

    script_accessors!();
}

#[async_trait]
impl ChatsBackend for MockChats {
    async fn create_chat(&self, req: &CreateChatRequest) -> Result<ChatRecord> {
        self.script.lock().unwrap().check("create_chat")?;
        let chat = ChatRecord {
            chat_id: Uuid::new_v4(),
            vault_id: req.vault_id,
            name: req.name.clone(),
            is_archived: false,
            created_at: Utc::now(),
            history: None,
        };
        self.chats
            .lock()
            .unwrap()
            .insert(chat.chat_id, (req.user_id, chat.clone()));
        Ok(chat)
    }

    async fn delete_chat(&self, chat_id: Uuid) -> Result<()> {
        self.script.lock().unwrap().check("delete_chat")?;
        self.chats.lock().unwrap().remove(&chat_id);
        Ok(())
    }

    async fn rename_chat(&self, chat_id: Uuid, name: &str) -> Result<()> {
        self.script.lock().unwrap().check("rename_chat")?;
        let mut chats = self.chats.lock().unwrap();
        match chats.get_mut(&chat_id) {
            Some((_, chat)) => {
                chat.name = name.to_string();
                Ok(())
            }
            None => Err(not_found("chat")),
        }
    }

    async fn set_archived(&self, chat_id: Uuid, archived: bool) -> Result<()> {
        self.script.lock().unwrap().check("set_archived")?;
        let mut chats = self.chats.lock().unwrap();
        match chats.get_mut(&chat_id) {
            Some((_, chat)) => {
                chat.is_archived = archived;
                Ok(())
            }
            None => Err(not_found("chat")),
        }
    }

    async fn chats_by_user(&self, user_id: Uuid, archived: bool) -> Result<Vec<ChatRecord>> {
        self.script.lock().unwrap().check("chats_by_user")?;
        Ok(self
            .chats
            .lock()
            .unwrap()
            .values()
            .filter(|(owner, chat)| *owner == user_id && chat.is_archived == archived)
            .map(|(_, chat)| chat.clone())
            .collect())
    }

    async fn chats_by_vault(&self, vault_id: Uuid) -> Result<Vec<ChatRecord>> {
        self.script.lock().unwrap().check("chats_by_vault")?;
        Ok(self
            .chats
            .lock()
            .unwrap()
            .values()
            .filter(|(_, chat)| chat.vault_id == vault_id)
            .map(|(_, chat)| chat.clone())
            .collect())
    }

    async fn chat_by_id(&self, chat_id: Uuid) -> Result<ChatRecord> {
        self.script.lock().unwrap().check("chat_by_id")?;
        self.chats
            .lock()
            .unwrap()
            .get(&chat_id)
            .map(|(_, chat)| chat.clone())
            .ok_or_else(|| not_found("chat"))
    }
}

// =============================================================================
// HISTORY SERVICE MOCK
// =============================================================================

/// Mock history service backed by an in-memory map.
#[derive(Clone, Default)]
pub struct MockHistory {
    script: Arc<Mutex<Script>>,
    histories: Arc<Mutex<HashMap<Uuid, Vec<MessageRecord>>>>,
}

impl MockHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a history with messages.
    pub fn seed(&self, chat_id: Uuid, messages: Vec<MessageRecord>) {
        self.histories.lock().unwrap().insert(chat_id, messages);
    }

    /// Whether a history record currently exists.
    pub fn contains(&self, chat_id: Uuid) -> bool {
        self.histories.lock().unwrap().contains_key(&chat_id)
    }

    /// Snapshot of one history's messages.
    pub fn messages(&self, chat_id: Uuid) -> Vec<MessageRecord> {
        self.histories
            .lock()
            .unwrap()
            .get(&chat_id)
            .cloned()
            .unwrap_or_default()
    }

    script_accessors!();
}

#[async_trait]
impl HistoryBackend for MockHistory {
    async fn create_history(&self, chat_id: Uuid) -> Result<()> {
        self.script.lock().unwrap().check("create_history")?;
        self.histories.lock().unwrap().insert(chat_id, Vec::new());
        Ok(())
    }

    async fn delete_history(&self, chat_id: Uuid) -> Result<()> {
        self.script.lock().unwrap().check("delete_history")?;
        self.histories.lock().unwrap().remove(&chat_id);
        Ok(())
    }

    async fn clear_history(&self, chat_id: Uuid) -> Result<()> {
        self.script.lock().unwrap().check("clear_history")?;
        match self.histories.lock().unwrap().get_mut(&chat_id) {
            Some(messages) => {
                messages.clear();
                Ok(())
            }
            None => Err(not_found("history")),
        }
    }

    async fn add_user_message(&self, chat_id: Uuid, content: &str) -> Result<()> {
        self.script.lock().unwrap().check("add_user_message")?;
        self.histories
            .lock()
            .unwrap()
            .entry(chat_id)
            .or_default()
            .push(MessageRecord::user(content));
        Ok(())
    }

    async fn add_ai_message(&self, chat_id: Uuid, message: &AiMessage) -> Result<()> {
        self.script.lock().unwrap().check("add_ai_message")?;
        self.histories
            .lock()
            .unwrap()
            .entry(chat_id)
            .or_default()
            .push(MessageRecord::ai(message.clone()));
        Ok(())
    }

    async fn history(&self, chat_id: Uuid) -> Result<HistoryRecord> {
        self.script.lock().unwrap().check("history")?;
        self.histories
            .lock()
            .unwrap()
            .get(&chat_id)
            .map(|messages| HistoryRecord {
                chat_id,
                messages: messages.clone(),
            })
            .ok_or_else(|| not_found("history"))
    }
}

// =============================================================================
// VAULT SERVICE MOCK
// =============================================================================

/// Mock vault service backed by in-memory maps.
#[derive(Clone, Default)]
pub struct MockVaults {
    script: Arc<Mutex<Script>>,
    vaults: Arc<Mutex<HashMap<Uuid, VaultRecord>>>,
    documents: Arc<Mutex<HashMap<Uuid, DocumentRecord>>>,
}

impl MockVaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a vault record.
    pub fn seed(&self, vault: VaultRecord) {
        self.vaults.lock().unwrap().insert(vault.vault_id, vault);
    }

    /// Whether a vault record currently exists.
    pub fn contains(&self, vault_id: Uuid) -> bool {
        self.vaults.lock().unwrap().contains_key(&vault_id)
    }

    script_accessors!();
}

#[async_trait]
impl VaultsBackend for MockVaults {
    async fn create_vault(
        &self,
        req: &CreateVaultRequest,
        files: &[DocumentUpload],
    ) -> Result<VaultRecord> {
        self.script.lock().unwrap().check("create_vault")?;
        let vault_id = Uuid::new_v4();
        let mut summaries = Vec::with_capacity(files.len());
        {
            let mut documents = self.documents.lock().unwrap();
            for file in files {
                let document_id = Uuid::new_v4();
                summaries.push(DocumentSummary {
                    document_id,
                    name: file.file_name.clone(),
                });
                documents.insert(
                    document_id,
                    DocumentRecord {
                        document_id,
                        vault_id,
                        name: file.file_name.clone(),
                        text: String::from_utf8_lossy(&file.content).into_owned(),
                    },
                );
            }
        }
        let vault = VaultRecord {
            vault_id,
            user_id: req.user_id,
            name: req.name.clone(),
            kind: req.kind,
            created_at: Utc::now(),
            documents: summaries,
        };
        self.vaults.lock().unwrap().insert(vault_id, vault.clone());
        Ok(vault)
    }

    async fn vault_by_id(&self, vault_id: Uuid) -> Result<VaultRecord> {
        self.script.lock().unwrap().check("vault_by_id")?;
        self.vaults
            .lock()
            .unwrap()
            .get(&vault_id)
            .cloned()
            .ok_or_else(|| not_found("vault"))
    }

    async fn vaults_by_user(&self, user_id: Uuid) -> Result<Vec<VaultPreview>> {
        self.script.lock().unwrap().check("vaults_by_user")?;
        Ok(self
            .vaults
            .lock()
            .unwrap()
            .values()
            .filter(|v| v.user_id == user_id)
            .map(|v| VaultPreview {
                vault_id: v.vault_id,
                name: v.name.clone(),
                kind: v.kind,
            })
            .collect())
    }

    async fn delete_vault(&self, vault_id: Uuid) -> Result<()> {
        self.script.lock().unwrap().check("delete_vault")?;
        self.vaults.lock().unwrap().remove(&vault_id);
        self.documents
            .lock()
            .unwrap()
            .retain(|_, d| d.vault_id != vault_id);
        Ok(())
    }

    async fn rename_vault(&self, vault_id: Uuid, name: &str) -> Result<()> {
        self.script.lock().unwrap().check("rename_vault")?;
        match self.vaults.lock().unwrap().get_mut(&vault_id) {
            Some(vault) => {
                vault.name = name.to_string();
                Ok(())
            }
            None => Err(not_found("vault")),
        }
    }

    async fn add_document(&self, vault_id: Uuid, file: &DocumentUpload) -> Result<VaultRecord> {
        self.script.lock().unwrap().check("add_document")?;
        let document_id = Uuid::new_v4();
        let mut vaults = self.vaults.lock().unwrap();
        let vault = vaults.get_mut(&vault_id).ok_or_else(|| not_found("vault"))?;
        vault.documents.push(DocumentSummary {
            document_id,
            name: file.file_name.clone(),
        });
        self.documents.lock().unwrap().insert(
            document_id,
            DocumentRecord {
                document_id,
                vault_id,
                name: file.file_name.clone(),
                text: String::from_utf8_lossy(&file.content).into_owned(),
            },
        );
        Ok(vault.clone())
    }

    async fn delete_document(&self, vault_id: Uuid, document_id: Uuid) -> Result<()> {
        self.script.lock().unwrap().check("delete_document")?;
        if let Some(vault) = self.vaults.lock().unwrap().get_mut(&vault_id) {
            vault.documents.retain(|d| d.document_id != document_id);
        }
        self.documents.lock().unwrap().remove(&document_id);
        Ok(())
    }

    async fn vault_documents(&self, vault_id: Uuid) -> Result<Vec<DocumentRecord>> {
        self.script.lock().unwrap().check("vault_documents")?;
        Ok(self
            .documents
            .lock()
            .unwrap()
            .values()
            .filter(|d| d.vault_id == vault_id)
            .cloned()
            .collect())
    }

    async fn document_by_id(&self, document_id: Uuid) -> Result<DocumentRecord> {
        self.script.lock().unwrap().check("document_by_id")?;
        self.documents
            .lock()
            .unwrap()
            .get(&document_id)
            .cloned()
            .ok_or_else(|| not_found("document"))
    }
}

// =============================================================================
// ANSWER SERVICE MOCK
// =============================================================================

/// Mock answer backend returning a fixed response.
///
/// Records the history length and vault id of every call so tests can verify
/// truncation and dispatch.
#[derive(Clone)]
pub struct MockAnswer {
    script: Arc<Mutex<Script>>,
    response: Arc<Mutex<AiMessage>>,
    seen: Arc<Mutex<Vec<AnswerCall>>>,
}

/// One recorded answer invocation.
#[derive(Debug, Clone)]
pub struct AnswerCall {
    pub vault_id: Option<Uuid>,
    pub query: String,
    pub history_len: usize,
}

impl MockAnswer {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script::default())),
            response: Arc::new(Mutex::new(AiMessage {
                content: response.into(),
                traceback: Vec::new(),
            })),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replace the fixed response, traceback included.
    pub fn set_response(&self, response: AiMessage) {
        *self.response.lock().unwrap() = response;
    }

    /// All recorded invocations.
    pub fn invocations(&self) -> Vec<AnswerCall> {
        self.seen.lock().unwrap().clone()
    }

    script_accessors!();
}

impl Default for MockAnswer {
    fn default() -> Self {
        Self::new("Mock answer")
    }
}

#[async_trait]
impl AnswerBackend for MockAnswer {
    async fn answer(
        &self,
        vault_id: Option<Uuid>,
        query: &str,
        history: &[MessageRecord],
    ) -> Result<AiMessage> {
        self.script.lock().unwrap().check("answer")?;
        self.seen.lock().unwrap().push(AnswerCall {
            vault_id,
            query: query.to_string(),
            history_len: history.len(),
        });
        Ok(self.response.lock().unwrap().clone())
    }
}

fn not_found(entity: &str) -> Error {
    Error::Upstream {
        status: 404,
        detail: format!("{} not found", entity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaultgate_core::VaultKind;

    #[tokio::test]
    async fn test_mock_chats_create_and_fetch() {
        let chats = MockChats::new();
        let req = CreateChatRequest {
            user_id: Uuid::new_v4(),
            vault_id: Uuid::new_v4(),
            name: "Site notes".to_string(),
        };
        let chat = chats.create_chat(&req).await.unwrap();
        let fetched = chats.chat_by_id(chat.chat_id).await.unwrap();
        assert_eq!(fetched.name, "Site notes");
        assert_eq!(chats.call_count("create_chat"), 1);
        assert_eq!(chats.calls(), vec!["create_chat", "chat_by_id"]);
    }

    #[tokio::test]
    async fn test_scripted_failure_and_recovery() {
        let chats = MockChats::new();
        chats.fail_on("delete_chat", Error::Unavailable("Chat".to_string()));

        let err = chats.delete_chat(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::Unavailable(_)));

        chats.recover("delete_chat");
        assert!(chats.delete_chat(Uuid::new_v4()).await.is_ok());
        assert_eq!(chats.call_count("delete_chat"), 2);
    }

    #[tokio::test]
    async fn test_mock_history_append_order() {
        let history = MockHistory::new();
        let chat_id = Uuid::new_v4();
        history.create_history(chat_id).await.unwrap();
        history.add_user_message(chat_id, "hello").await.unwrap();
        history
            .add_ai_message(
                chat_id,
                &AiMessage {
                    content: "hi".to_string(),
                    traceback: Vec::new(),
                },
            )
            .await
            .unwrap();

        let record = history.history(chat_id).await.unwrap();
        assert_eq!(record.messages.len(), 2);
        assert_eq!(record.messages[0].content, "hello");
        assert_eq!(record.messages[1].content, "hi");
    }

    #[tokio::test]
    async fn test_mock_history_missing_is_upstream_404() {
        let history = MockHistory::new();
        let err = history.history(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::Upstream { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_mock_vaults_document_lifecycle() {
        let vaults = MockVaults::new();
        let req = CreateVaultRequest {
            user_id: Uuid::new_v4(),
            name: "Blueprints".to_string(),
            kind: VaultKind::Vector,
        };
        let upload = DocumentUpload {
            file_name: "plan.txt".to_string(),
            content: b"load-bearing walls".to_vec(),
        };
        let vault = vaults.create_vault(&req, &[upload.clone()]).await.unwrap();
        assert_eq!(vault.documents.len(), 1);

        let updated = vaults.add_document(vault.vault_id, &upload).await.unwrap();
        assert_eq!(updated.documents.len(), 2);

        let docs = vaults.vault_documents(vault.vault_id).await.unwrap();
        assert_eq!(docs.len(), 2);

        vaults
            .delete_document(vault.vault_id, docs[0].document_id)
            .await
            .unwrap();
        assert_eq!(vaults.vault_documents(vault.vault_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_answer_records_invocations() {
        let answer = MockAnswer::new("42");
        let vault_id = Uuid::new_v4();
        let history = vec![MessageRecord::user("q1"), MessageRecord::user("q2")];

        let reply = answer
            .answer(Some(vault_id), "meaning of life", &history)
            .await
            .unwrap();
        assert_eq!(reply.content, "42");

        let calls = answer.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].vault_id, Some(vault_id));
        assert_eq!(calls[0].history_len, 2);
    }
}
