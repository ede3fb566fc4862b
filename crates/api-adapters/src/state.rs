//! Shared handler state.

use std::sync::Arc;

use auth_adapters::CookieSessions;
use services::{ContentService, UserDirectory};

/// State shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<UserDirectory>,
    pub sessions: Arc<CookieSessions>,
    pub content: Arc<ContentService>,
    /// Posts served per index window.
    pub posts_per_page: usize,
}
