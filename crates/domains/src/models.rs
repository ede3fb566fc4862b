//! # Domain Models
//!
//! These structs represent the core entities of rusty-blog and double as
//! the on-disk schema: the two collection files are plain JSON arrays of
//! `User` and `Entry`, so the serde field names here are load-bearing.

use serde::{Deserialize, Serialize};

/// An account that can author and moderate posts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "user_name")]
    pub username: String,
    /// Salted SHA-256 digest of the password (URL-safe base64); never plaintext.
    #[serde(rename = "password")]
    pub password_hash: String,
    /// Derived once from the username at creation; doubles as the hashing salt
    /// and as the authorship key for entries. 0 is never a real id.
    pub id: u32,
    /// The current session token, or empty when logged out. At most one live
    /// session per user: a new login overwrites the old token.
    #[serde(default)]
    pub session: String,
    /// Grants the account-creation privilege. Set at creation only.
    #[serde(rename = "admin")]
    pub is_admin: bool,
}

/// A blog post with its embedded comments.
///
/// The entries collection is a chronological stack: creation prepends,
/// update removes-then-prepends (bump-to-top), deletion removes in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub text: String,
    /// Denormalized author username, display only.
    pub author: String,
    /// The sole authorization key for update/delete.
    #[serde(rename = "author_id")]
    pub author_id: u32,
    /// Formatted local timestamp, refreshed on every update.
    pub date: String,
    /// Immutable after creation.
    pub id: u32,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A reader comment on an entry, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    /// Free-text display name, "Anonymous" when the reader left none.
    pub author: String,
    pub date: String,
    /// Flipped false -> true by moderation; never back.
    #[serde(default)]
    pub verified: bool,
    pub id: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_with_fixed_keys() {
        let user = User {
            username: "konstantin".into(),
            password_hash: "digest".into(),
            id: 689017489,
            session: String::new(),
            is_admin: true,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["user_name"], "konstantin");
        assert_eq!(json["password"], "digest");
        assert_eq!(json["id"], 689017489u32);
        assert_eq!(json["session"], "");
        assert_eq!(json["admin"], true);
    }

    #[test]
    fn entry_round_trips_through_json() {
        let entry = Entry {
            title: "Post #1".into(),
            text: "hello".into(),
            author: "konstantin".into(),
            author_id: 689017489,
            date: "01.02.2026 - 12:30".into(),
            id: 976620356,
            comments: vec![Comment {
                text: "nice".into(),
                author: "Anonymous".into(),
                date: "01.02.2026 - 12:31".into(),
                verified: false,
                id: 489017489,
            }],
            keywords: vec!["rust".into()],
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
        assert!(json.contains("\"author_id\""));
    }

    #[test]
    fn comment_defaults_to_unverified() {
        let raw = r#"{"text":"t","author":"a","date":"d","id":1}"#;
        let comment: Comment = serde_json::from_str(raw).unwrap();
        assert!(!comment.verified);
    }
}
