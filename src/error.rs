use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum AllServeError {
    // Authentication errors
    InvalidCredentials,
    AccessDenied,

    // Token errors
    TokenExpired,
    TokenInvalidSignature,
    TokenMalformed(String),

    // Provisioning errors
    ProvisioningConflict(String),

    // Storage errors
    StorageError(String),

    // Key material errors
    KeyMaterial(String),

    // Configuration errors
    ConfigError(String),
}

impl fmt::Display for AllServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Same message for unknown login and wrong password: responses must
            // not reveal whether a login exists.
            Self::InvalidCredentials => write!(f, "Invalid login or password"),
            Self::AccessDenied => write!(f, "Access denied: insufficient authority"),
            Self::TokenExpired => write!(f, "Token expired"),
            Self::TokenInvalidSignature => write!(f, "Token signature verification failed"),
            Self::TokenMalformed(msg) => write!(f, "Malformed token: {}", msg),
            Self::ProvisioningConflict(msg) => write!(f, "Provisioning conflict: {}", msg),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::KeyMaterial(msg) => write!(f, "Key material error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for AllServeError {}

// Generic result type for allserve-auth
pub type Result<T> = std::result::Result<T, AllServeError>;
