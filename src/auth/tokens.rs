//! Token issuance and validation.
//!
//! Tokens are self-contained: every claim needed to authorize a request
//! travels inside the signed token, so validation never touches storage.

use jsonwebtoken::{decode, decode_header, encode, Algorithm, Header, Validation};
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::time::Duration;

use crate::auth::claims::{Claims, TokenKind};
use crate::auth::keys::KeyMaterial;
use crate::auth::user::Principal;
use crate::error::{AllServeError, Result};

/// The pair handed to a client after a successful authentication.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds, echoed in the token response
    pub expires_in: u64,
}

/// Lightweight principal rebuilt from a validated token. Attached to the
/// request context by the bearer guard; never reaches storage.
#[derive(Debug, Clone)]
pub struct RequestPrincipal {
    claims: Claims,
}

impl RequestPrincipal {
    pub fn user_id(&self) -> &str {
        &self.claims.sub
    }

    pub fn kind(&self) -> TokenKind {
        self.claims.kind
    }

    /// The authority claim, verbatim. Refresh tokens carry none.
    pub fn authority(&self) -> Option<&str> {
        self.claims.authority.as_deref()
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}

/// Mints signed access/refresh pairs for authenticated principals.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    key_id: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(material: &KeyMaterial, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding_key: material.encoding_key(),
            key_id: material.key_id().to_string(),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issue an access/refresh pair. Stateless: nothing is recorded.
    pub fn issue(&self, principal: &Principal) -> Result<TokenPair> {
        let access = self.sign(Claims::for_principal(
            principal,
            TokenKind::Access,
            self.access_ttl,
        ))?;
        let refresh = self.sign(Claims::for_principal(
            principal,
            TokenKind::Refresh,
            self.refresh_ttl,
        ))?;

        Ok(TokenPair {
            access_token: access,
            refresh_token: refresh,
            expires_in: self.access_ttl.as_secs(),
        })
    }

    fn sign(&self, claims: Claims) -> Result<String> {
        let mut header = Header::new(Algorithm::EdDSA);
        header.kid = Some(self.key_id.clone());

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| AllServeError::KeyMaterial(format!("Token signing failed: {}", e)))
    }
}

/// Verifies incoming bearer tokens against the process's active key.
pub struct TokenValidator {
    decoding_key: DecodingKey,
    key_id: String,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(material: &KeyMaterial) -> Self {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.validate_exp = true;
        // No leeway: a token past its expiry timestamp is always rejected.
        validation.leeway = 0;

        Self {
            decoding_key: material.decoding_key(),
            key_id: material.key_id().to_string(),
            validation,
        }
    }

    /// Verify signature, key id and expiry, then rebuild a request-scoped
    /// principal from the embedded claims.
    pub fn validate(&self, token: &str) -> Result<RequestPrincipal> {
        let header = decode_header(token)
            .map_err(|e| AllServeError::TokenMalformed(e.to_string()))?;

        // Tokens signed by a previous process carry a stale kid and are
        // rejected here; clients must authenticate again after a restart.
        match header.kid {
            Some(ref kid) if *kid == self.key_id => {}
            _ => return Err(AllServeError::TokenInvalidSignature),
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AllServeError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AllServeError::TokenInvalidSignature
                }
                _ => AllServeError::TokenMalformed(e.to_string()),
            }
        })?;

        Ok(RequestPrincipal {
            claims: data.claims,
        })
    }
}

/// Extracts bearer token from an Authorization header value
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    auth_header
        .strip_prefix("Bearer ")
        .map(|token| token.to_string())
}
