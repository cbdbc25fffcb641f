//! Abstract user-directory interface for pluggable backends
//!
//! The authentication core touches persistence only through this trait:
//! lookup by login or email, and account creation. Everything else the
//! business backend does with users lives outside this service.

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::password::PasswordEncoder;
use crate::auth::user::{Profile, User, UserStatus};
use crate::error::Result;

/// Fields for a user row about to be created.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub role: String,
    pub status: UserStatus,
    pub profile: Profile,
    pub login: String,
    /// Digest, never plaintext
    pub password_hash: String,
    pub email: String,
}

impl NewUser {
    /// Registration path: hash the incoming plaintext before it ever reaches
    /// a directory.
    pub fn from_plain_password(
        name: String,
        role: String,
        status: UserStatus,
        profile: Profile,
        login: String,
        plain_password: &str,
        email: String,
        encoder: &dyn PasswordEncoder,
    ) -> Result<Self> {
        Ok(Self {
            name,
            role,
            status,
            profile,
            login,
            password_hash: encoder.hash(plain_password)?,
            email,
        })
    }
}

/// User lookup/creation interface
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Get user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Get user by login
    async fn find_by_login(&self, login: &str) -> Result<Option<User>>;

    /// Get user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Create a new user.
    ///
    /// Must be atomic with respect to the unique login/email constraints: a
    /// concurrent insert of the same login or email makes exactly one call
    /// win and the others fail with `ProvisioningConflict`.
    async fn create_user(&self, fields: NewUser) -> Result<User>;
}
