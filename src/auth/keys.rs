//! Process-lifetime signing key material.
//!
//! One asymmetric keypair plus a random key identifier, generated during
//! startup and immutable afterwards. Nothing is persisted: a restart mints a
//! fresh key, and tokens signed by the previous process fail the kid check.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use jsonwebtoken::{DecodingKey, EncodingKey};
use ring::rand::SystemRandom;
use ring::signature::{Ed25519KeyPair, KeyPair};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AllServeError, Result};

/// The published key set, served at `/oauth2/jwks`
#[derive(Debug, Clone, Serialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

/// A single public key entry (OKP / Ed25519)
#[derive(Debug, Clone, Serialize)]
pub struct Jwk {
    pub kty: &'static str,
    pub crv: &'static str,
    pub alg: &'static str,
    #[serde(rename = "use")]
    pub key_use: &'static str,
    pub kid: String,
    /// base64url-encoded public key bytes
    pub x: String,
}

/// Immutable signing key material held for the process lifetime.
pub struct KeyMaterial {
    key_id: String,
    pkcs8: Vec<u8>,
    public_key: Vec<u8>,
}

impl KeyMaterial {
    /// Generate a fresh Ed25519 keypair and a random key identifier.
    ///
    /// Called exactly once at startup; a failure here is fatal because the
    /// service cannot issue or validate tokens without a signing key.
    pub fn generate() -> Result<Self> {
        let rng = SystemRandom::new();
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng)
            .map_err(|e| AllServeError::KeyMaterial(format!("Key generation failed: {}", e)))?;
        let key_pair = Ed25519KeyPair::from_pkcs8(pkcs8.as_ref())
            .map_err(|e| AllServeError::KeyMaterial(format!("Generated key unreadable: {}", e)))?;

        Ok(Self {
            key_id: Uuid::new_v4().to_string(),
            public_key: key_pair.public_key().as_ref().to_vec(),
            pkcs8: pkcs8.as_ref().to_vec(),
        })
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Signing key for the token issuer
    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_ed_der(&self.pkcs8)
    }

    /// Verification key for the token validator
    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_ed_der(&self.public_key)
    }

    /// Public portion as a JWK set document
    pub fn jwk_set(&self) -> JwkSet {
        JwkSet {
            keys: vec![Jwk {
                kty: "OKP",
                crv: "Ed25519",
                alg: "EdDSA",
                key_use: "sig",
                kid: self.key_id.clone(),
                x: URL_SAFE_NO_PAD.encode(&self.public_key),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_material_has_unique_kid() {
        let a = KeyMaterial::generate().unwrap();
        let b = KeyMaterial::generate().unwrap();
        assert_ne!(a.key_id(), b.key_id());
        assert_ne!(a.public_key, b.public_key);
    }

    #[test]
    fn jwk_set_exposes_only_public_portion() {
        let material = KeyMaterial::generate().unwrap();
        let set = material.jwk_set();
        assert_eq!(set.keys.len(), 1);
        let jwk = &set.keys[0];
        assert_eq!(jwk.kty, "OKP");
        assert_eq!(jwk.kid, material.key_id());
        let decoded = URL_SAFE_NO_PAD.decode(&jwk.x).unwrap();
        assert_eq!(decoded, material.public_key);
    }
}
