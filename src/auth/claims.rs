use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::auth::user::Principal;

/// The two kinds of self-contained tokens this service mints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims structure.
///
/// Refresh tokens deliberately carry only subject and lifetime: authorization
/// state may go stale before the token is exchanged, so it travels only in
/// access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (UTC timestamp)
    pub iat: usize,
    /// Expiration time (UTC timestamp)
    pub exp: usize,
    /// Token kind (access | refresh)
    pub kind: TokenKind,
    /// Single authority string, copied verbatim from the user's profile tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "funcao", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "statusUsuario", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Claims {
    /// Bare claims: subject and lifetime only.
    pub fn new(subject: String, kind: TokenKind, ttl: Duration) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs() as usize;

        Self {
            sub: subject,
            iat: now,
            exp: now + ttl.as_secs() as usize,
            kind,
            authority: None,
            email: None,
            name: None,
            role: None,
            status: None,
        }
    }

    /// Claims for a principal, enriched per token kind: access tokens embed
    /// the authorization claims, refresh tokens stay bare.
    pub fn for_principal(principal: &Principal, kind: TokenKind, ttl: Duration) -> Self {
        let mut claims = Self::new(principal.user().id.to_string(), kind, ttl);

        if kind == TokenKind::Access {
            let user = principal.user();
            claims.authority = Some(principal.authority().to_string());
            claims.email = Some(user.email.clone());
            claims.name = Some(user.name.clone());
            claims.role = Some(user.role.clone());
            claims.status = Some(user.status.as_str().to_string());
        }

        claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::user::{Principal, Profile, User, UserStatus};
    use uuid::Uuid;

    fn sample_principal() -> Principal {
        let now = chrono::Utc::now();
        Principal::new(User {
            id: Uuid::new_v4(),
            name: "Ana Silva".to_string(),
            role: "Gerente".to_string(),
            status: UserStatus::Active,
            profile: Profile::Admin,
            login: "ana".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            email: "ana@example.com".to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    #[test]
    fn access_claims_carry_enrichment() {
        let principal = sample_principal();
        let claims =
            Claims::for_principal(&principal, TokenKind::Access, Duration::from_secs(3600));

        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.authority.as_deref(), Some("ADMIN"));
        assert_eq!(claims.email.as_deref(), Some("ana@example.com"));
        assert_eq!(claims.name.as_deref(), Some("Ana Silva"));
        assert_eq!(claims.role.as_deref(), Some("Gerente"));
        assert_eq!(claims.status.as_deref(), Some("ATIVO"));
    }

    #[test]
    fn refresh_claims_stay_bare() {
        let principal = sample_principal();
        let claims =
            Claims::for_principal(&principal, TokenKind::Refresh, Duration::from_secs(5400));

        assert_eq!(claims.kind, TokenKind::Refresh);
        assert!(claims.authority.is_none());
        assert!(claims.email.is_none());
        assert!(claims.name.is_none());
        assert!(claims.role.is_none());
        assert!(claims.status.is_none());
    }

    #[test]
    fn wire_names_match_token_consumers() {
        use crate::constants::{CLAIM_AUTHORITY, CLAIM_EMAIL, CLAIM_NAME, CLAIM_ROLE, CLAIM_STATUS};

        let principal = sample_principal();
        let claims =
            Claims::for_principal(&principal, TokenKind::Access, Duration::from_secs(3600));
        let json = serde_json::to_value(&claims).unwrap();

        for claim in [CLAIM_AUTHORITY, CLAIM_EMAIL, CLAIM_NAME, CLAIM_ROLE, CLAIM_STATUS] {
            assert!(json.get(claim).is_some(), "missing claim {}", claim);
        }
        assert!(json.get("name").is_none());
    }
}
