use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account status. Serialized with the wire spellings the frontend and the
/// token consumers match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserStatus {
    #[serde(rename = "ATIVO")]
    Active,
    #[serde(rename = "INATIVO")]
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ATIVO",
            UserStatus::Inactive => "INATIVO",
        }
    }
}

/// Authority profile of a user. Exactly one per user; its wire spelling is the
/// single authority string carried in access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Profile {
    #[serde(rename = "MASTER")]
    Master,
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "FINANCEIRO")]
    Finance,
    #[serde(rename = "OPERADOR")]
    Operator,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Master => "MASTER",
            Profile::Admin => "ADMIN",
            Profile::Finance => "FINANCEIRO",
            Profile::Operator => "OPERADOR",
        }
    }

    /// Default for accounts created without an explicit assignment
    /// (federated auto-provisioning).
    pub fn lowest_privilege() -> Self {
        Profile::Operator
    }
}

/// A persisted account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Free-text job-function label
    pub role: String,
    /// Account status
    pub status: UserStatus,
    /// Authority profile
    pub profile: Profile,
    /// Login (globally unique)
    pub login: String,
    /// Password digest. The only persisted credential form; never plaintext.
    pub password_hash: String,
    /// Email (globally unique)
    pub email: String,
    // audit fields
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// The unified authenticated identity produced by either authentication path
/// (local credentials or a federated assertion). Request-scoped; wraps exactly
/// one user and is never persisted.
#[derive(Debug, Clone)]
pub struct Principal {
    user: User,
}

impl Principal {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// The single derived authority string: the wrapped user's profile tag,
    /// used verbatim with no prefix transformation.
    pub fn authority(&self) -> &'static str {
        self.user.profile.as_str()
    }
}
