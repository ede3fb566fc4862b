//! The user directory.
//!
//! CRUD-ish operations over the users collection. Every mutator is a
//! whole-collection read-modify-write; the directory owns the single write
//! lock for the collection, so all user writes in the process are serialized
//! through it.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use domains::{DomainError, PromptSource, Result, User, UserRepo};

use crate::credentials::hash_password;
use crate::identity::content_id;

/// Account validation thresholds, injected from configuration.
#[derive(Debug, Clone, Copy)]
pub struct AccountPolicy {
    pub min_username_len: usize,
    pub min_password_len: usize,
}

pub struct UserDirectory {
    repo: Arc<dyn UserRepo>,
    policy: AccountPolicy,
    // Held for every full load-mutate-save cycle on the users collection.
    write_lock: Mutex<()>,
}

impl UserDirectory {
    pub fn new(repo: Arc<dyn UserRepo>, policy: AccountPolicy) -> Self {
        Self {
            repo,
            policy,
            write_lock: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> AccountPolicy {
        self.policy
    }

    /// Creates the initial admin account if the store holds no users yet.
    ///
    /// Prompts for a username and password, re-asking until each satisfies
    /// the configured minimum length. Usernames containing `#` are re-asked
    /// too, since `#` is the session cookie delimiter.
    pub async fn bootstrap_if_empty(&self, prompts: &mut dyn PromptSource) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if !self.repo.load().await?.is_empty() {
            return Ok(());
        }

        info!(
            min_username = self.policy.min_username_len,
            min_password = self.policy.min_password_len,
            "no accounts exist yet, creating the initial admin"
        );
        let username = self.read_username(prompts)?;
        let id = content_id(&[&username]);
        let password_hash = self.read_password(prompts, id)?;

        let user = User {
            username,
            password_hash,
            id,
            session: String::new(),
            is_admin: true,
        };
        self.repo.replace_all(std::slice::from_ref(&user)).await?;
        info!(username = %user.username, "initial admin account created");
        Ok(())
    }

    fn read_username(&self, prompts: &mut dyn PromptSource) -> Result<String> {
        loop {
            let line = prompts.prompt(&format!(
                "Enter a valid username ({}+ chars, no '#'): ",
                self.policy.min_username_len
            ))?;
            let username = line.trim();
            if username.chars().count() >= self.policy.min_username_len
                && !username.contains('#')
            {
                return Ok(username.to_string());
            }
        }
    }

    fn read_password(&self, prompts: &mut dyn PromptSource, id: u32) -> Result<String> {
        loop {
            let line = prompts.prompt(&format!(
                "Enter a valid password ({}+ chars): ",
                self.policy.min_password_len
            ))?;
            let password = line.trim();
            if password.chars().count() >= self.policy.min_password_len {
                return Ok(hash_password(password, id));
            }
        }
    }

    /// Looks a user up by username.
    pub async fn find_by_name(&self, username: &str) -> Result<Option<User>> {
        let users = self.repo.load().await?;
        Ok(users.into_iter().find(|user| user.username == username))
    }

    /// Validates a username/password pair against the stored digest.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        let users = self.repo.load().await?;
        Ok(users.iter().any(|user| {
            user.username == username && hash_password(password, user.id) == user.password_hash
        }))
    }

    /// Creates a new account on behalf of `requester`.
    ///
    /// Any authenticated user may create accounts, admin or not; passing
    /// `None` fails with `Unauthorized`. Validation failures carry the
    /// message to render; independent violations are concatenated.
    pub async fn create_account(
        &self,
        username: &str,
        password: &str,
        confirmation: &str,
        is_admin: bool,
        requester: Option<&User>,
    ) -> Result<String> {
        if requester.is_none() {
            return Err(DomainError::Unauthorized);
        }

        let _guard = self.write_lock.lock().await;
        let mut users = self.repo.load().await?;
        if users.iter().any(|user| user.username == username) {
            return Err(DomainError::Validation("Username already exists.\n".into()));
        }
        if password != confirmation {
            return Err(DomainError::Validation("Passwords don't match.\n".into()));
        }
        let mut message = String::new();
        if username.chars().count() < self.policy.min_username_len {
            message.push_str(&format!(
                "Username must have at least {} chars.\n",
                self.policy.min_username_len
            ));
        }
        if username.contains('#') {
            message.push_str("Username must not contain '#'.\n");
        }
        if password.chars().count() < self.policy.min_password_len {
            message.push_str(&format!(
                "Password must have at least {} chars.\n",
                self.policy.min_password_len
            ));
        }
        if !message.is_empty() {
            return Err(DomainError::Validation(message));
        }

        let id = content_id(&[username]);
        users.push(User {
            username: username.to_string(),
            password_hash: hash_password(password, id),
            id,
            session: String::new(),
            is_admin,
        });
        self.repo.replace_all(&users).await?;
        info!(username, is_admin, "account created");
        Ok(username.to_string())
    }

    /// Changes the password of an authenticated user, rehashing with the
    /// user's existing id.
    pub async fn change_password(
        &self,
        current_user: &User,
        password: &str,
        confirmation: &str,
    ) -> Result<()> {
        if password != confirmation {
            return Err(DomainError::Validation("Passwords don't match.\n".into()));
        }
        if password.chars().count() < self.policy.min_password_len {
            return Err(DomainError::Validation(format!(
                "Password must have at least {} chars.\n",
                self.policy.min_password_len
            )));
        }

        let _guard = self.write_lock.lock().await;
        let rehashed = hash_password(password, current_user.id);
        let mut users = self.repo.load().await?;
        for user in users.iter_mut() {
            if user.id == current_user.id {
                user.password_hash = rehashed.clone();
            }
        }
        self.repo.replace_all(&users).await?;
        Ok(())
    }

    /// Stores `token` as the named user's current session. Unknown usernames
    /// are a silent no-op.
    pub async fn record_session(&self, username: &str, token: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.repo.load().await?;
        if let Some(user) = users.iter_mut().find(|user| user.username == username) {
            user.session = token.to_string();
            self.repo.replace_all(&users).await?;
        }
        Ok(())
    }

    /// Clears the user's session, ending it for every holder of the token.
    pub async fn clear_session(&self, user: &User) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.repo.load().await?;
        if let Some(stored) = users.iter_mut().find(|stored| stored.id == user.id) {
            stored.session = String::new();
            self.repo.replace_all(&users).await?;
        }
        Ok(())
    }
}
