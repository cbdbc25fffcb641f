//! Identity unification and token issuance
//!
//! Two authentication paths (local credentials and federated assertions)
//! collapse into one [`user::Principal`], which the token issuer turns into a
//! self-contained signed pair. Validation is stateless against the process's
//! key material.

pub mod claims;
pub mod credentials;
pub mod federated;
pub mod keys;
pub mod password;
pub mod policy;
pub mod tokens;
pub mod user;
