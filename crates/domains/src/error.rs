//! # DomainError
//!
//! Centralized error handling for the rusty-blog workspace.
//!
//! Lookup misses are not errors here: operations surface them as booleans,
//! `Option`s, or the reserved zero id, so the enum only covers failures a
//! caller has to branch on.

use thiserror::Error;

/// The primary error type for all core operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Validation failure (length minimums, confirmation mismatch, taken
    /// username). The message is meant to be rendered to the end user as-is.
    #[error("{0}")]
    Validation(String),

    /// The caller holds no valid session for an operation that requires one.
    #[error("unauthorized")]
    Unauthorized,

    /// A collection file could not be written. Read failures never surface
    /// here; they degrade to an empty collection instead.
    #[error("storage unavailable: {0}")]
    Storage(String),
}

/// A specialized Result type for rusty-blog logic.
pub type Result<T> = std::result::Result<T, DomainError>;

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Storage(err.to_string())
    }
}
