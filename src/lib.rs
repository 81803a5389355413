//! Competitive programming submission and contest scoring backend
//!
//! Accepts code submissions over HTTP, judges them against per-problem test
//! suites through a remote execution service, and maintains ICPC-style
//! contest leaderboards recomputed from the full submission log.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod judge;
pub mod models;
pub mod realtime;
pub mod services;
pub mod state;
pub mod utils;

pub use config::CONFIG;
pub use error::{AppError, AppResult};
pub use state::AppState;
