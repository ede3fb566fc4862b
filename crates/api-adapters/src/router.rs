//! Route table.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/login", post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route("/posts", post(handlers::create_post))
        .route("/posts/{id}", get(handlers::get_post))
        .route("/posts/{id}/update", post(handlers::update_post))
        .route("/posts/{id}/delete", post(handlers::delete_post))
        .route("/posts/{id}/comments", post(handlers::add_comment))
        .route("/comments/verify", post(handlers::verify_comment))
        .route("/account", post(handlers::create_account))
        .route("/account/password", post(handlers::change_password))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
