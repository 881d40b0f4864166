//! Vault lifecycle behavior: the deletion fan-out and the cache-aside
//! vault/document operations.

mod common;

use common::{harness, vault_record};
use uuid::Uuid;
use vaultgate_core::{CreateChatRequest, CreateVaultRequest, DocumentUpload, Error, VaultKind};

fn vault_req(user_id: Uuid) -> CreateVaultRequest {
    CreateVaultRequest {
        user_id,
        name: "Blueprints".to_string(),
        kind: VaultKind::Vector,
    }
}

fn upload(name: &str) -> DocumentUpload {
    DocumentUpload {
        file_name: name.to_string(),
        content: b"load-bearing walls".to_vec(),
    }
}

/// Create `n` chats referencing one vault through the messaging saga.
async fn seed_chats(h: &common::Harness, user_id: Uuid, vault_id: Uuid, n: usize) -> Vec<Uuid> {
    let mut ids = Vec::new();
    for i in 0..n {
        let chat = h
            .messaging
            .create_chat(&CreateChatRequest {
                user_id,
                vault_id,
                name: format!("chat {}", i),
            })
            .await
            .unwrap();
        ids.push(chat.chat_id);
    }
    ids
}

#[tokio::test]
async fn delete_vault_removes_every_chat_then_the_vault() {
    let h = harness();
    let user_id = Uuid::new_v4();
    let vault = h
        .vault_service
        .create_vault(&vault_req(user_id), &[])
        .await
        .unwrap();
    let chat_ids = seed_chats(&h, user_id, vault.vault_id, 3).await;

    h.vault_service
        .delete_vault_and_chats(user_id, vault.vault_id)
        .await
        .unwrap();

    for chat_id in chat_ids {
        assert!(!h.chats.contains(chat_id));
        assert!(!h.history.contains(chat_id));
    }
    assert!(!h.vaults.contains(vault.vault_id));
    assert_eq!(h.chats.call_count("delete_chat"), 3);
    assert_eq!(h.vaults.call_count("delete_vault"), 1);
}

#[tokio::test]
async fn delete_vault_with_no_chats_still_deletes_the_vault() {
    let h = harness();
    let user_id = Uuid::new_v4();
    let vault = h
        .vault_service
        .create_vault(&vault_req(user_id), &[])
        .await
        .unwrap();

    h.vault_service
        .delete_vault_and_chats(user_id, vault.vault_id)
        .await
        .unwrap();

    assert!(!h.vaults.contains(vault.vault_id));
    assert_eq!(h.chats.call_count("delete_chat"), 0);
}

#[tokio::test]
async fn vault_survives_when_a_chat_deletion_fails() {
    let h = harness();
    let user_id = Uuid::new_v4();
    let vault = h
        .vault_service
        .create_vault(&vault_req(user_id), &[])
        .await
        .unwrap();
    seed_chats(&h, user_id, vault.vault_id, 3).await;

    // History deletions fail, so every chat saga fails.
    h.history
        .fail_on("delete_history", Error::Unavailable("History".to_string()));

    let err = h
        .vault_service
        .delete_vault_and_chats(user_id, vault.vault_id)
        .await
        .unwrap_err();

    match err {
        Error::Internal(msg) => {
            assert!(msg.contains(&vault.vault_id.to_string()));
            assert!(msg.contains("not deleted"));
        }
        other => panic!("Expected aggregate Internal error, got {:?}", other),
    }
    assert!(h.vaults.contains(vault.vault_id));
    assert_eq!(h.vaults.call_count("delete_vault"), 0);
}

#[tokio::test]
async fn deletion_failure_does_not_restore_deleted_chats() {
    let h = harness();
    let user_id = Uuid::new_v4();
    let vault = h
        .vault_service
        .create_vault(&vault_req(user_id), &[])
        .await
        .unwrap();
    seed_chats(&h, user_id, vault.vault_id, 2).await;

    // Chat record deletions fail; each saga's history deletion has already
    // happened by then, and compensation re-creates histories empty.
    h.chats
        .fail_on("delete_chat", Error::Unavailable("Chat".to_string()));

    let err = h
        .vault_service
        .delete_vault_and_chats(user_id, vault.vault_id)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Internal(_)));
    assert!(h.vaults.contains(vault.vault_id));
    // The fan-out stops at the first failure; the vault's live chat list is
    // what a retry would re-read.
    assert!(h.history.call_count("delete_history") >= 1);
}

#[tokio::test]
async fn delete_vault_invalidates_vault_cache_entries() {
    let h = harness();
    let user_id = Uuid::new_v4();
    let vault = h
        .vault_service
        .create_vault(&vault_req(user_id), &[upload("plan.txt")])
        .await
        .unwrap();
    // Warm preview and document entries.
    h.vault_service.get_user_vaults(user_id).await.unwrap();
    h.vault_service
        .get_vault_documents(vault.vault_id)
        .await
        .unwrap();

    h.vault_service
        .delete_vault_and_chats(user_id, vault.vault_id)
        .await
        .unwrap();

    assert!(h.vault_cache.get_vault(vault.vault_id).await.is_none());
    assert!(h.vault_cache.get_previews(user_id).await.is_none());
    assert!(h.vault_cache.get_documents(vault.vault_id).await.is_none());
}

#[tokio::test]
async fn create_vault_writes_through_and_drops_previews() {
    let h = harness();
    let user_id = Uuid::new_v4();
    // Warm an (empty) preview collection first.
    h.vault_service.get_user_vaults(user_id).await.unwrap();

    let vault = h
        .vault_service
        .create_vault(&vault_req(user_id), &[upload("plan.txt")])
        .await
        .unwrap();

    // Vault record served from cache, previews re-fetched.
    h.vault_service.get_vault(vault.vault_id).await.unwrap();
    assert_eq!(h.vaults.call_count("vault_by_id"), 0);
    let previews = h.vault_service.get_user_vaults(user_id).await.unwrap();
    assert_eq!(previews.len(), 1);
    assert_eq!(h.vaults.call_count("vaults_by_user"), 2);
}

#[tokio::test]
async fn get_vault_is_cache_aside() {
    let h = harness();
    let vault = vault_record(Uuid::new_v4(), Uuid::new_v4(), VaultKind::Graph);
    h.vaults.seed(vault.clone());

    h.vault_service.get_vault(vault.vault_id).await.unwrap();
    h.vault_service.get_vault(vault.vault_id).await.unwrap();
    assert_eq!(h.vaults.call_count("vault_by_id"), 1);
}

#[tokio::test]
async fn rename_vault_invalidates_record_and_previews() {
    let h = harness();
    let user_id = Uuid::new_v4();
    let vault = h
        .vault_service
        .create_vault(&vault_req(user_id), &[])
        .await
        .unwrap();
    h.vault_service.get_user_vaults(user_id).await.unwrap();

    h.vault_service
        .rename_vault(user_id, vault.vault_id, "As-builts")
        .await
        .unwrap();

    let fetched = h.vault_service.get_vault(vault.vault_id).await.unwrap();
    assert_eq!(fetched.name, "As-builts");
    let previews = h.vault_service.get_user_vaults(user_id).await.unwrap();
    assert_eq!(previews[0].name, "As-builts");
}

#[tokio::test]
async fn add_document_refreshes_vault_and_drops_document_list() {
    let h = harness();
    let user_id = Uuid::new_v4();
    let vault = h
        .vault_service
        .create_vault(&vault_req(user_id), &[upload("plan.txt")])
        .await
        .unwrap();
    h.vault_service
        .get_vault_documents(vault.vault_id)
        .await
        .unwrap();

    h.vault_service
        .add_document(vault.vault_id, &upload("specs.pdf"))
        .await
        .unwrap();

    // Updated vault served from the write-through copy.
    let fetched = h.vault_service.get_vault(vault.vault_id).await.unwrap();
    assert_eq!(fetched.documents.len(), 2);
    assert_eq!(h.vaults.call_count("vault_by_id"), 0);
    // Document list re-fetched.
    let docs = h
        .vault_service
        .get_vault_documents(vault.vault_id)
        .await
        .unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(h.vaults.call_count("vault_documents"), 2);
}

#[tokio::test]
async fn delete_document_invalidates_all_document_entries() {
    let h = harness();
    let user_id = Uuid::new_v4();
    let vault = h
        .vault_service
        .create_vault(&vault_req(user_id), &[upload("plan.txt")])
        .await
        .unwrap();
    let document_id = vault.documents[0].document_id;
    // Warm the single-document entry.
    h.vault_service.get_document(document_id).await.unwrap();

    h.vault_service
        .delete_document(vault.vault_id, document_id)
        .await
        .unwrap();

    assert!(h.vault_cache.get_vault(vault.vault_id).await.is_none());
    assert!(h.vault_cache.get_document(document_id).await.is_none());
    let err = h.vault_service.get_document(document_id).await.unwrap_err();
    assert!(matches!(err, Error::Upstream { status: 404, .. }));
}
