//! # configs
//!
//! Application configuration, threaded into each component at construction
//! time. Nothing in the workspace reads configuration ambiently.
//!
//! Sources, in override order: built-in defaults, an optional
//! `rusty-blog.toml` next to the working directory, then `RUSTY_BLOG_*`
//! environment variables (a `.env` file is honored first via dotenvy).

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigsError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory holding the two collection files; created at startup.
    pub data_dir: PathBuf,
    /// Listen address for the web layer.
    pub bind_addr: String,
    /// Minutes until an issued session cookie expires.
    pub session_minutes: i64,
    /// Minimum username length, in characters.
    pub min_username_len: usize,
    /// Minimum password length, in characters.
    pub min_password_len: usize,
    /// Posts served per index window.
    pub posts_per_page: usize,
}

impl AppConfig {
    /// Loads configuration from defaults, the optional config file, and the
    /// environment.
    pub fn load() -> Result<Self, ConfigsError> {
        // Make a local .env visible to the Environment source below.
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .set_default("data_dir", "data")?
            .set_default("bind_addr", "127.0.0.1:8080")?
            .set_default("session_minutes", 15)?
            .set_default("min_username_len", 6)?
            .set_default("min_password_len", 8)?
            .set_default("posts_per_page", 5)?
            .add_source(config::File::with_name("rusty-blog").required(false))
            .add_source(config::Environment::with_prefix("RUSTY_BLOG"))
            .build()?;
        let loaded: Self = settings.try_deserialize()?;
        debug!(?loaded, "configuration loaded");
        Ok(loaded)
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join("users.json")
    }

    pub fn entries_file(&self) -> PathBuf {
        self.data_dir.join("entries.json")
    }
}
