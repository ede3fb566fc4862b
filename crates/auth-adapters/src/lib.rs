//! # auth-adapters
//!
//! Cookie-based session management: opaque token generation, the
//! `username#token` cookie format, and the login/logout/authenticate
//! lifecycle over the user directory.

mod sessions;
mod token;

pub use sessions::{CookieSessions, SessionCookie, SESSION_COOKIE_NAME};
pub use token::session_token;
