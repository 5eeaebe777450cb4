use rusty_gate::auth::service::{
    AuthService, Credentials, LoginOutcome, RegisterOutcome, RegistrationRequest,
};
use rusty_gate::auth::token::TokenManager;
use rusty_gate::storage::{MemoryUserStore, UserStore};
use std::sync::Arc;
use std::time::Duration;

fn service() -> (Arc<AuthService>, Arc<MemoryUserStore>) {
    let store = Arc::new(MemoryUserStore::new());
    let tokens = Arc::new(TokenManager::new("test-secret-key", Duration::from_secs(900)));
    let service = Arc::new(AuthService::new(
        store.clone(),
        tokens,
        Duration::from_secs(7 * 86400),
    ));
    (service, store)
}

fn registration(email: &str, client_type: &str) -> RegistrationRequest {
    RegistrationRequest {
        email: email.to_string(),
        password: "correct horse battery staple".to_string(),
        first_name: Some("Test".to_string()),
        last_name: None,
        client_type: client_type.to_string(),
    }
}

fn credentials(email: &str, password: &str, client_type: &str) -> Credentials {
    Credentials {
        email: email.to_string(),
        password: password.to_string(),
        client_type: client_type.to_string(),
    }
}

#[tokio::test]
async fn test_register_then_login() {
    let (service, _) = service();

    let outcome = service
        .register(&registration("alice@example.com", "Mobile"))
        .await
        .unwrap();
    let rendered = match outcome {
        RegisterOutcome::Success(rendered) => rendered,
        other => panic!("unexpected register outcome: {:?}", other),
    };
    assert!(rendered.body.access_token.is_some());

    let outcome = service
        .login(&credentials(
            "alice@example.com",
            "correct horse battery staple",
            "Mobile",
        ))
        .await
        .unwrap();
    assert!(matches!(outcome, LoginOutcome::Success(_)));
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
    let (service, _) = service();

    service
        .register(&registration("alice@example.com", "Mobile"))
        .await
        .unwrap();

    let wrong_password = service
        .login(&credentials("alice@example.com", "wrong", "Mobile"))
        .await
        .unwrap();
    let unknown_email = service
        .login(&credentials("nobody@example.com", "anything", "Mobile"))
        .await
        .unwrap();

    assert!(matches!(wrong_password, LoginOutcome::InvalidCredentials));
    assert!(matches!(unknown_email, LoginOutcome::InvalidCredentials));
}

#[tokio::test]
async fn test_email_lookup_is_normalized() {
    let (service, _) = service();

    service
        .register(&registration("Alice@Example.COM", "Mobile"))
        .await
        .unwrap();

    let outcome = service
        .login(&credentials(
            "  alice@example.com ",
            "correct horse battery staple",
            "Mobile",
        ))
        .await
        .unwrap();
    assert!(matches!(outcome, LoginOutcome::Success(_)));
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let (service, _) = service();

    let first = service
        .register(&registration("alice@example.com", "Mobile"))
        .await
        .unwrap();
    assert!(matches!(first, RegisterOutcome::Success(_)));

    // Same address, different case: still the same account
    let second = service
        .register(&registration("ALICE@example.com", "Mobile"))
        .await
        .unwrap();
    assert!(matches!(second, RegisterOutcome::EmailAlreadyRegistered));
}

#[tokio::test]
async fn test_concurrent_duplicate_registration_single_winner() {
    let (service, store) = service();

    let a = {
        let service = service.clone();
        tokio::spawn(
            async move { service.register(&registration("race@example.com", "Mobile")).await },
        )
    };
    let b = {
        let service = service.clone();
        tokio::spawn(
            async move { service.register(&registration("race@example.com", "Mobile")).await },
        )
    };

    let outcomes = [a.await.unwrap().unwrap(), b.await.unwrap().unwrap()];

    let successes = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, RegisterOutcome::Success(_)))
        .count();
    let duplicates = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, RegisterOutcome::EmailAlreadyRegistered))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(duplicates, 1);

    // Exactly one account exists
    assert!(store
        .find_by_email("race@example.com")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_inactive_account_rejected_with_distinct_outcome() {
    let (service, store) = service();

    service
        .register(&registration("alice@example.com", "Mobile"))
        .await
        .unwrap();

    let mut user = store
        .find_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    user.is_active = false;
    store.update(user).await.unwrap();

    // Correct credentials, deactivated account
    let outcome = service
        .login(&credentials(
            "alice@example.com",
            "correct horse battery staple",
            "Mobile",
        ))
        .await
        .unwrap();
    assert!(matches!(outcome, LoginOutcome::AccountInactive));
}

#[tokio::test]
async fn test_unknown_client_type_fails_before_account_creation() {
    let (service, store) = service();

    let outcome = service
        .register(&registration("alice@example.com", "Desktop"))
        .await
        .unwrap();
    assert!(matches!(outcome, RegisterOutcome::InvalidClientType));

    // No account was created for the rejected request
    assert!(store
        .find_by_email("alice@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_login_unknown_client_type() {
    let (service, _) = service();

    let outcome = service
        .login(&credentials("alice@example.com", "anything", "desktop"))
        .await
        .unwrap();
    assert!(matches!(outcome, LoginOutcome::InvalidClientType));
}

#[tokio::test]
async fn test_current_user_projection() {
    let (service, store) = service();

    service
        .register(&registration("alice@example.com", "Mobile"))
        .await
        .unwrap();
    let user = store
        .find_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();

    let profile = service.current_user(&user.id).await.unwrap().unwrap();
    assert_eq!(profile.email, "alice@example.com");
    assert_eq!(profile.first_name, Some("Test".to_string()));
    assert!(profile.is_active);

    assert!(service.current_user("missing-id").await.unwrap().is_none());
}
