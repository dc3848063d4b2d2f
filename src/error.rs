//! Crate-wide error type and result alias.
//!
//! Provider failures are classified so the logs can tell an expired key from
//! a rate limit, but the router absorbs all of them: nothing in this enum
//! ever reaches a caller of [`RequestRouter::process_user_input`].
//!
//! [`RequestRouter::process_user_input`]: crate::router::RequestRouter::process_user_input

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KittError>;

/// All errors produced by kitt-ai internals.
#[derive(Debug, Error)]
pub enum KittError {
    /// Configuration file is unreadable or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic provider failure (network, malformed response, 5xx).
    #[error("Provider error: {0}")]
    Provider(String),

    /// Credential rejected by the provider (HTTP 401/403).
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Provider quota or rate limit exhausted (HTTP 429).
    #[error("Rate limited: {0}")]
    RateLimit(String),

    /// JSON (de)serialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Map a non-success HTTP status from a provider API to a typed error.
///
/// The router treats every variant identically (skip to the next provider),
/// so this classification exists for logging and tests only.
pub fn parse_provider_error(status: u16, message: &str) -> KittError {
    match status {
        401 | 403 => KittError::Auth(message.to_string()),
        429 => KittError::RateLimit(message.to_string()),
        _ => KittError::Provider(message.to_string()),
    }
}
