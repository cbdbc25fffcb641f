use std::sync::Arc;

use allserve_auth::auth::federated::FederatedLoginHandler;
use allserve_auth::auth::password::{Argon2Encoder, PasswordEncoder};
use allserve_auth::auth::user::{Profile, UserStatus};
use allserve_auth::storage::{MemoryUserDirectory, NewUser, UserDirectory};

fn handler(directory: Arc<MemoryUserDirectory>) -> FederatedLoginHandler {
    FederatedLoginHandler::new(directory, Arc::new(Argon2Encoder::new()))
}

#[tokio::test]
async fn first_login_auto_provisions_with_defaults() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let handler = handler(directory.clone());

    let principal = handler.handle("ana@example.com", "Ana Silva").await.unwrap();

    let user = principal.user();
    assert_eq!(user.login, "ana");
    assert_eq!(user.email, "ana@example.com");
    assert_eq!(user.name, "Ana Silva");
    assert_eq!(user.role, "N/A");
    assert_eq!(user.status, UserStatus::Active);
    assert_eq!(user.profile, Profile::Operator);
    assert_eq!(directory.len().await, 1);
}

#[tokio::test]
async fn provisioned_password_is_not_derived_from_email() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let encoder = Argon2Encoder::new();
    let handler = FederatedLoginHandler::new(directory.clone(), Arc::new(Argon2Encoder::new()));

    handler.handle("ana@example.com", "Ana Silva").await.unwrap();

    let user = directory.find_by_email("ana@example.com").await.unwrap().unwrap();
    // The local part must not work as a password
    assert!(!encoder.verify("ana", &user.password_hash).unwrap());
    assert!(!encoder.verify("ana@example.com", &user.password_hash).unwrap());
}

#[tokio::test]
async fn second_login_links_to_same_user() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let handler = handler(directory.clone());

    let first = handler.handle("ana@example.com", "Ana Silva").await.unwrap();
    let second = handler.handle("ana@example.com", "Ana S.").await.unwrap();

    assert_eq!(first.user().id, second.user().id);
    // Linking, not replacement: the stored name is untouched
    assert_eq!(second.user().name, "Ana Silva");
    assert_eq!(directory.len().await, 1);
}

#[tokio::test]
async fn existing_local_account_is_linked_by_email() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let encoder = Argon2Encoder::new();
    let fields = NewUser::from_plain_password(
        "Ana Silva".to_string(),
        "Gerente".to_string(),
        UserStatus::Active,
        Profile::Admin,
        "ana.silva".to_string(),
        "local-password",
        "ana@example.com".to_string(),
        &encoder,
    )
    .unwrap();
    let existing = directory.create_user(fields).await.unwrap();

    let handler = handler(directory.clone());
    let principal = handler.handle("ana@example.com", "Ana from IdP").await.unwrap();

    assert_eq!(principal.user().id, existing.id);
    assert_eq!(principal.authority(), "ADMIN");
    assert_eq!(directory.len().await, 1);
}

#[tokio::test]
async fn concurrent_first_logins_create_exactly_one_user() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let handler = Arc::new(FederatedLoginHandler::new(
        directory.clone(),
        Arc::new(Argon2Encoder::new()),
    ));

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let handler = handler.clone();
        tasks.push(tokio::spawn(async move {
            handler.handle("ana@example.com", "Ana Silva").await
        }));
    }

    let mut ids = Vec::new();
    for task in tasks {
        let principal = task.await.unwrap().unwrap();
        ids.push(principal.user().id);
    }

    assert_eq!(directory.len().await, 1);
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
}
