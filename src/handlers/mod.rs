//! HTTP request handlers

pub mod contests;
pub mod health;
pub mod submissions;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Build the API router
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/submissions", submissions::routes())
        .nest("/contests", contests::routes())
}
