//! Submission endpoints

pub mod handler;
pub mod request;
pub mod response;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the submission routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::submit).get(handler::list_submissions))
        .route("/run", post(handler::run_samples))
        .route("/{id}", get(handler::get_submission))
}
