//! # services
//!
//! Business logic of rusty-blog: credential hashing, identity generation,
//! the user directory, and the content service. Everything here talks to
//! persistence through the ports in `domains` and carries no I/O of its own
//! beyond those ports.

pub mod content;
pub mod credentials;
pub mod directory;
pub mod identity;

pub use content::{filter_posts, ContentService};
pub use directory::{AccountPolicy, UserDirectory};

/// Timestamp format shared by entries and comments, e.g. `07.08.2026 - 14:05`.
pub const DATE_FORMAT: &str = "%d.%m.%Y - %H:%M";
