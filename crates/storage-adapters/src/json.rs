//! JSON flat-file stores.
//!
//! Reads soft-fail: a missing, unreadable, or malformed file loads as an
//! empty collection, because "no file yet" and "empty store" are the same
//! thing at first boot. Writes truncate and rewrite the whole file, and a
//! write failure is surfaced as an error the binary treats as fatal.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tracing::{debug, warn};

use domains::{DomainError, Entry, EntryRepo, Result, User, UserRepo};

async fn read_collection<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let raw = match fs::read(path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no collection file yet, starting empty");
            return Vec::new();
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "collection file unreadable, treating as empty");
            return Vec::new();
        }
    };
    match serde_json::from_slice(&raw) {
        Ok(items) => items,
        Err(err) => {
            // A corrupt file is indistinguishable from an empty store to
            // callers; the log line is the only place the difference shows.
            warn!(path = %path.display(), %err, "collection file is not valid JSON, treating as empty");
            Vec::new()
        }
    }
}

async fn write_collection<T: Serialize + Sync>(path: &Path, items: &[T]) -> Result<()> {
    let json = serde_json::to_vec(items)?;
    fs::write(path, json)
        .await
        .map_err(|err| DomainError::Storage(format!("{}: {err}", path.display())))
}

/// Users collection as a JSON array file.
pub struct JsonUserStore {
    path: PathBuf,
}

impl JsonUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl UserRepo for JsonUserStore {
    async fn load(&self) -> Result<Vec<User>> {
        Ok(read_collection(&self.path).await)
    }

    async fn replace_all(&self, users: &[User]) -> Result<()> {
        write_collection(&self.path, users).await
    }
}

/// Entries collection as a JSON array file.
pub struct JsonEntryStore {
    path: PathBuf,
}

impl JsonEntryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl EntryRepo for JsonEntryStore {
    async fn load(&self) -> Result<Vec<Entry>> {
        Ok(read_collection(&self.path).await)
    }

    async fn replace_all(&self, entries: &[Entry]) -> Result<()> {
        write_collection(&self.path, entries).await
    }
}
