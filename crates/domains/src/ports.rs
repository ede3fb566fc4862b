//! # Core Ports
//!
//! Any adapter must implement these traits to be used by the services and
//! the binary.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Entry, User};

/// Persistence contract for the users collection.
///
/// The store is whole-document: `load` returns a snapshot of the entire
/// collection and `replace_all` truncates and rewrites it. There is no
/// partial update path.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Returns every stored user. A store that does not exist yet (or cannot
    /// be decoded) loads as an empty collection, never as an error.
    async fn load(&self) -> Result<Vec<User>>;

    /// Replaces the whole collection. A failure here is unrecoverable for
    /// the caller.
    async fn replace_all(&self, users: &[User]) -> Result<()>;
}

/// Persistence contract for the entries collection. Same whole-document
/// semantics as [`UserRepo`].
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait EntryRepo: Send + Sync {
    async fn load(&self) -> Result<Vec<Entry>>;
    async fn replace_all(&self, entries: &[Entry]) -> Result<()>;
}

/// Interactive input for the first-run bootstrap.
///
/// Wrapping stdin behind this keeps the re-prompt loops testable with a
/// scripted implementation.
pub trait PromptSource {
    /// Displays `message` and returns one line of input, untrimmed.
    fn prompt(&mut self, message: &str) -> std::io::Result<String>;
}
