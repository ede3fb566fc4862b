//! # storage-adapters
//!
//! Flat-file implementations of the persistence ports. Each collection is a
//! single JSON array in its own file.

mod json;

pub use json::{JsonEntryStore, JsonUserStore};
