//! Shared test harness: the three orchestrators wired against mock backends
//! and an in-memory cache.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use vaultgate_cache::{ChatCache, KeyValueCache, VaultCache};
use vaultgate_client::mock::{MockAnswer, MockChats, MockHistory, MockVaults};
use vaultgate_core::{ChatRecord, Tokenizer, VaultKind, VaultRecord};
use vaultgate_gateway::{AnswerService, MessagingService, VaultService};

/// Counts whitespace-separated words so truncation tests stay independent of
/// the BPE vocabulary.
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }

    fn name(&self) -> &str {
        "words"
    }
}

pub struct Harness {
    pub chats: MockChats,
    pub history: MockHistory,
    pub vaults: MockVaults,
    pub graph: MockAnswer,
    pub vector: MockAnswer,
    pub kv: KeyValueCache,
    pub chat_cache: ChatCache,
    pub vault_cache: VaultCache,
    pub messaging: Arc<MessagingService>,
    pub vault_service: Arc<VaultService>,
    pub answer: Arc<AnswerService>,
}

pub fn harness() -> Harness {
    harness_with_budget(1000)
}

pub fn harness_with_budget(token_budget: usize) -> Harness {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let chats = MockChats::new();
    let history = MockHistory::new();
    let vaults = MockVaults::new();
    let graph = MockAnswer::new("graph answer");
    let vector = MockAnswer::new("vector answer");

    let kv = KeyValueCache::in_memory();
    let chat_cache = ChatCache::new(kv.clone());
    let vault_cache = VaultCache::new(kv.clone());

    let messaging = Arc::new(MessagingService::new(
        Arc::new(chats.clone()),
        Arc::new(history.clone()),
        chat_cache.clone(),
    ));
    let vault_service = Arc::new(VaultService::new(
        Arc::new(vaults.clone()),
        vault_cache.clone(),
        messaging.clone(),
    ));
    let answer = Arc::new(AnswerService::new(
        vault_service.clone(),
        Arc::new(history.clone()),
        Arc::new(graph.clone()),
        Arc::new(vector.clone()),
        chat_cache.clone(),
        Arc::new(WordTokenizer),
        token_budget,
    ));

    Harness {
        chats,
        history,
        vaults,
        graph,
        vector,
        kv,
        chat_cache,
        vault_cache,
        messaging,
        vault_service,
        answer,
    }
}

pub fn chat_record(chat_id: Uuid, vault_id: Uuid) -> ChatRecord {
    ChatRecord {
        chat_id,
        vault_id,
        name: "Site notes".to_string(),
        is_archived: false,
        created_at: Utc::now(),
        history: None,
    }
}

pub fn vault_record(vault_id: Uuid, user_id: Uuid, kind: VaultKind) -> VaultRecord {
    VaultRecord {
        vault_id,
        user_id,
        name: "Blueprints".to_string(),
        kind,
        created_at: Utc::now(),
        documents: vec![],
    }
}
