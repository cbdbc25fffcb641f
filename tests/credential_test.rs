use std::sync::Arc;

use allserve_auth::auth::credentials::CredentialAuthenticator;
use allserve_auth::auth::password::{Argon2Encoder, PasswordEncoder};
use allserve_auth::auth::user::{Profile, UserStatus};
use allserve_auth::error::AllServeError;
use allserve_auth::storage::{MemoryUserDirectory, NewUser, UserDirectory};

async fn seeded_directory(
    encoder: &Argon2Encoder,
) -> Arc<MemoryUserDirectory> {
    let directory = Arc::new(MemoryUserDirectory::new());
    let fields = NewUser::from_plain_password(
        "Carlos Souza".to_string(),
        "Financeiro".to_string(),
        UserStatus::Active,
        Profile::Finance,
        "carlos".to_string(),
        "correct-horse",
        "carlos@example.com".to_string(),
        encoder,
    )
    .unwrap();
    directory.create_user(fields).await.unwrap();
    directory
}

#[tokio::test]
async fn valid_credentials_produce_principal_with_profile_authority() {
    let encoder = Arc::new(Argon2Encoder::new());
    let directory = seeded_directory(&encoder).await;
    let authenticator = CredentialAuthenticator::new(directory, encoder);

    let principal = authenticator
        .authenticate("carlos", "correct-horse")
        .await
        .unwrap();

    assert_eq!(principal.authority(), "FINANCEIRO");
    assert_eq!(principal.user().login, "carlos");
    assert_eq!(principal.user().email, "carlos@example.com");
}

#[tokio::test]
async fn wrong_password_and_unknown_login_are_indistinguishable() {
    let encoder = Arc::new(Argon2Encoder::new());
    let directory = seeded_directory(&encoder).await;
    let authenticator = CredentialAuthenticator::new(directory, encoder);

    let wrong_password = authenticator
        .authenticate("carlos", "wrong")
        .await
        .unwrap_err();
    let unknown_login = authenticator
        .authenticate("nobody", "whatever")
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, AllServeError::InvalidCredentials));
    assert!(matches!(unknown_login, AllServeError::InvalidCredentials));
    // Identical user-visible message: no enumeration signal
    assert_eq!(wrong_password.to_string(), unknown_login.to_string());
}

#[tokio::test]
async fn stored_credential_is_a_digest() {
    let encoder = Arc::new(Argon2Encoder::new());
    let directory = seeded_directory(&encoder).await;

    let user = directory.find_by_login("carlos").await.unwrap().unwrap();
    assert_ne!(user.password_hash, "correct-horse");
    assert!(encoder.verify("correct-horse", &user.password_hash).unwrap());
}
