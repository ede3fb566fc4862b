//! # api-adapters
//!
//! The web glue over the core: request fields in, plain data out. Handlers
//! extract already-parsed form/query values, call the services, and shape
//! thin JSON or text responses; no rendering, no business rules.

#[cfg(feature = "web-axum")]
mod handlers;
#[cfg(feature = "web-axum")]
mod router;
#[cfg(feature = "web-axum")]
mod state;

#[cfg(feature = "web-axum")]
pub use router::router;
#[cfg(feature = "web-axum")]
pub use state::AppState;
