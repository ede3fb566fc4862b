//! # rusty-blog binary
//!
//! The entry point that assembles the application: configuration, logging,
//! the flat-file stores, the services, and the web layer.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api_adapters::AppState;
use auth_adapters::CookieSessions;
use configs::AppConfig;
use domains::PromptSource;
use services::{AccountPolicy, ContentService, UserDirectory};
use storage_adapters::{JsonEntryStore, JsonUserStore};

/// Interactive prompts on the controlling terminal, used for the first-run
/// bootstrap only.
struct StdinPrompts;

impl PromptSource for StdinPrompts {
    fn prompt(&mut self, message: &str) -> io::Result<String> {
        print!("{message}");
        io::stdout().flush()?;
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed during bootstrap",
            ));
        }
        Ok(line)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .with_context(|| format!("creating data directory {}", config.data_dir.display()))?;

    let users = Arc::new(JsonUserStore::new(config.users_file()));
    let entries = Arc::new(JsonEntryStore::new(config.entries_file()));

    let directory = Arc::new(UserDirectory::new(
        users,
        AccountPolicy {
            min_username_len: config.min_username_len,
            min_password_len: config.min_password_len,
        },
    ));
    directory
        .bootstrap_if_empty(&mut StdinPrompts)
        .await
        .context("bootstrapping the initial account")?;

    let state = AppState {
        sessions: Arc::new(CookieSessions::new(directory.clone(), config.session_minutes)),
        directory,
        content: Arc::new(ContentService::new(entries)),
        posts_per_page: config.posts_per_page,
    };
    let app = api_adapters::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!(
        addr = %config.bind_addr,
        session_minutes = config.session_minutes,
        "rusty-blog is now running"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
