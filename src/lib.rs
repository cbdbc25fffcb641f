//! AllServe Auth - identity unification and token issuance
//!
//! This library collapses two authentication methods (local credentials and
//! federated assertions) into one principal keyed by email, mints
//! self-contained signed tokens, and validates them statelessly.

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod storage;

// Re-export main components
pub use config::*;
pub use constants::*;
