use rusty_gate::auth::user::User;
use rusty_gate::error::RustyGateError;
use rusty_gate::storage::{MemoryUserStore, UserStore};
use std::sync::Arc;

fn user(email: &str) -> User {
    User::new(email.to_string(), "hash".to_string())
}

#[tokio::test]
async fn test_lookup_by_email_and_id() {
    let store = MemoryUserStore::new();
    let inserted = store.insert(user("alice@example.com")).await.unwrap();

    let by_email = store
        .find_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, inserted.id);

    let by_id = store.find_by_id(&inserted.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, "alice@example.com");

    assert!(store
        .find_by_email("nobody@example.com")
        .await
        .unwrap()
        .is_none());
    assert!(store.find_by_id("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_concurrent_inserts_single_winner() {
    let store = Arc::new(MemoryUserStore::new());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.insert(user("race@example.com")).await
        }));
    }

    let mut winners = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(RustyGateError::DuplicateEmail(_)) => duplicates += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    // Uniqueness holds under any interleaving
    assert_eq!(winners, 1);
    assert_eq!(duplicates, 7);
}

#[tokio::test]
async fn test_update_cannot_steal_email() {
    let store = MemoryUserStore::new();
    store.insert(user("alice@example.com")).await.unwrap();
    let mut bob = store.insert(user("bob@example.com")).await.unwrap();

    bob.email = "alice@example.com".to_string();
    let result = store.update(bob).await;
    assert!(matches!(result, Err(RustyGateError::DuplicateEmail(_))));

    // Bob's record is untouched
    assert!(store
        .find_by_email("bob@example.com")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_update_flags_persist() {
    let store = MemoryUserStore::new();
    let mut stored = store.insert(user("alice@example.com")).await.unwrap();

    stored.is_active = false;
    store.update(stored.clone()).await.unwrap();

    let reloaded = store.find_by_id(&stored.id).await.unwrap().unwrap();
    assert!(!reloaded.is_active);
}
