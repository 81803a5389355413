//! Contest endpoints

pub mod handler;
pub mod response;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the contest routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/leaderboard", get(handler::get_leaderboard))
        .route(
            "/{id}/leaderboard/recompute",
            post(handler::recompute_leaderboard),
        )
}
