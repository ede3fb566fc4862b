//! # domains
//!
//! The central domain models and port definitions for rusty-blog.
//! Adapters and services depend on this crate; it depends on nothing else
//! in the workspace.

pub mod error;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ports::*;
