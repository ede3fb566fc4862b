//! Cookie session lifecycle.
//!
//! A session is a (username, token) pair persisted on the user record and
//! mirrored in the client-held cookie value `username#token`. The cookie
//! format is load-bearing: the value is split on `#` and the first two
//! parts are taken, which is why usernames may not contain `#`.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use domains::{Result, User};
use services::UserDirectory;

pub const SESSION_COOKIE_NAME: &str = "Session";

/// A freshly issued session cookie value and its expiry.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub value: String,
    pub expires: DateTime<Utc>,
}

pub struct CookieSessions {
    directory: Arc<UserDirectory>,
    lifetime_minutes: i64,
}

impl CookieSessions {
    pub fn new(directory: Arc<UserDirectory>, lifetime_minutes: i64) -> Self {
        Self {
            directory,
            lifetime_minutes,
        }
    }

    /// Issues a session for an already-validated username.
    ///
    /// The fresh token overwrites any previous one, invalidating older
    /// cookies for the same user.
    pub async fn login(&self, username: &str) -> Result<SessionCookie> {
        let token = super::token::session_token();
        self.directory.record_session(username, &token).await?;
        info!(username, "login");
        Ok(SessionCookie {
            value: format!("{username}#{token}"),
            expires: Utc::now() + Duration::minutes(self.lifetime_minutes),
        })
    }

    /// Ends the session named by the cookie. Malformed cookies and unknown
    /// users are silent no-ops; logout never reports failure.
    pub async fn logout(&self, cookie_value: &str) -> Result<()> {
        let Some((username, _token)) = split_cookie(cookie_value) else {
            return Ok(());
        };
        let Some(user) = self.directory.find_by_name(username).await? else {
            return Ok(());
        };
        self.directory.clear_session(&user).await?;
        info!(username, "logout");
        Ok(())
    }

    /// Resolves a cookie value to its user.
    ///
    /// Succeeds only when the user exists and its stored session is
    /// non-empty and equal to the cookie's token; everything else (parse
    /// failure, unknown user, token mismatch, logged-out user) is `None`.
    pub async fn authenticate(&self, cookie_value: &str) -> Result<Option<User>> {
        let Some((username, token)) = split_cookie(cookie_value) else {
            return Ok(None);
        };
        let Some(user) = self.directory.find_by_name(username).await? else {
            return Ok(None);
        };
        if !user.session.is_empty() && user.session == token {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}

fn split_cookie(value: &str) -> Option<(&str, &str)> {
    let parts: Vec<&str> = value.split('#').collect();
    if parts.len() < 2 {
        return None;
    }
    Some((parts[0], parts[1]))
}
