use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum RustyGateError {
    // Storage errors
    StorageError(String),
    DuplicateEmail(String),

    // Credential errors
    HashingError(String),

    // Token errors
    TokenError(String),

    // Configuration errors
    ConfigError(String),
}

impl fmt::Display for RustyGateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::DuplicateEmail(email) => write!(f, "Duplicate email: {}", email),
            Self::HashingError(msg) => write!(f, "Hashing error: {}", msg),
            Self::TokenError(msg) => write!(f, "Token error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for RustyGateError {}

// Generic result type for RustyGate
pub type Result<T> = std::result::Result<T, RustyGateError>;
