//! Shared fixtures for the integration suites.
//!
//! Every fixture works against real JSON stores in a per-test temp
//! directory, so the suites exercise the same persistence path the binary
//! uses.

use std::sync::Arc;

use tempfile::TempDir;

use auth_adapters::CookieSessions;
use domains::{PromptSource, User, UserRepo};
use services::{credentials, identity, AccountPolicy, ContentService, UserDirectory};
use storage_adapters::{JsonEntryStore, JsonUserStore};

pub const TEST_POLICY: AccountPolicy = AccountPolicy {
    min_username_len: 6,
    min_password_len: 8,
};

/// A workspace of wired components over temp-dir JSON stores.
pub struct Fixture {
    // Held for its Drop: deletes the temp dir with the store files.
    _dir: TempDir,
    pub users_path: std::path::PathBuf,
    pub entries_path: std::path::PathBuf,
    pub users: Arc<JsonUserStore>,
    pub entries: Arc<JsonEntryStore>,
    pub directory: Arc<UserDirectory>,
    pub sessions: Arc<CookieSessions>,
    pub content: Arc<ContentService>,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let users_path = dir.path().join("users.json");
        let entries_path = dir.path().join("entries.json");
        let users = Arc::new(JsonUserStore::new(&users_path));
        let entries = Arc::new(JsonEntryStore::new(&entries_path));
        let directory = Arc::new(UserDirectory::new(users.clone(), TEST_POLICY));
        let sessions = Arc::new(CookieSessions::new(directory.clone(), 15));
        let content = Arc::new(ContentService::new(entries.clone()));
        Self {
            _dir: dir,
            users_path,
            entries_path,
            users,
            entries,
            directory,
            sessions,
            content,
        }
    }

    /// Seeds a user with properly salted credentials and returns the record.
    pub async fn seed_user(&self, username: &str, password: &str, is_admin: bool) -> User {
        let id = identity::content_id(&[username]);
        let user = User {
            username: username.to_string(),
            password_hash: credentials::hash_password(password, id),
            id,
            session: String::new(),
            is_admin,
        };
        let mut all = self.users.load().await.expect("load users");
        all.push(user.clone());
        self.users.replace_all(&all).await.expect("seed user");
        user
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A `PromptSource` that replays a fixed script of input lines.
pub struct ScriptedPrompts {
    lines: Vec<String>,
}

impl ScriptedPrompts {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl PromptSource for ScriptedPrompts {
    fn prompt(&mut self, _message: &str) -> std::io::Result<String> {
        if self.lines.is_empty() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "prompt script exhausted",
            ));
        }
        Ok(self.lines.remove(0))
    }
}
