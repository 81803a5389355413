//! Problem model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Problem database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Problem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub difficulty: Option<String>,
    pub time_limit_ms: i32,
    pub memory_limit_kb: i32,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Problem {
    /// Time limit in seconds, the unit the judge expects
    pub fn time_limit_seconds(&self) -> f64 {
        self.time_limit_ms as f64 / 1000.0
    }
}
