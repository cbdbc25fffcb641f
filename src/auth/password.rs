//! Password hashing behind a small trait so the digest scheme stays swappable.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::error::{AllServeError, Result};

/// Hashing interface consumed by the authentication flows.
pub trait PasswordEncoder: Send + Sync {
    /// Hash a plaintext password into a self-describing digest
    fn hash(&self, plain: &str) -> Result<String>;

    /// Verify a plaintext password against a stored digest
    fn verify(&self, plain: &str, digest: &str) -> Result<bool>;
}

/// Argon2id encoder with explicit, configurable cost parameters.
pub struct Argon2Encoder {
    hasher: Argon2<'static>,
}

impl Argon2Encoder {
    /// Encoder with the argon2 crate's recommended defaults
    pub fn new() -> Self {
        Self {
            hasher: Argon2::default(),
        }
    }

    /// Encoder with explicit cost factors (memory KiB, iterations, parallelism)
    pub fn with_costs(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| AllServeError::ConfigError(format!("Invalid Argon2 costs: {}", e)))?;
        Ok(Self {
            hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordEncoder for Argon2Encoder {
    fn hash(&self, plain: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.hasher
            .hash_password(plain.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AllServeError::StorageError(format!("Password hashing failed: {}", e)))
    }

    fn verify(&self, plain: &str, digest: &str) -> Result<bool> {
        let parsed = PasswordHash::new(digest)
            .map_err(|e| AllServeError::StorageError(format!("Corrupt password digest: {}", e)))?;
        Ok(self
            .hasher
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }
}

/// Random password seed for auto-provisioned federated accounts. Never derived
/// from public data such as the email local part.
pub fn random_password_seed() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let encoder = Argon2Encoder::new();
        let digest = encoder.hash("s3cret").unwrap();
        assert_ne!(digest, "s3cret");
        assert!(encoder.verify("s3cret", &digest).unwrap());
        assert!(!encoder.verify("wrong", &digest).unwrap());
    }

    #[test]
    fn random_seed_is_not_constant() {
        let a = random_password_seed();
        let b = random_password_seed();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
