//! Test case model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Test case database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TestCase {
    pub id: Uuid,
    pub problem_id: Uuid,
    pub input: String,
    pub expected_output: String,
    pub is_sample: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

/// Which test suite an evaluation runs against
///
/// Real submissions are judged on the hidden suite; the interactive "run"
/// path only sees the sample cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteKind {
    Hidden,
    Sample,
}

impl SuiteKind {
    /// Value of the `is_sample` column for this suite
    pub fn is_sample(&self) -> bool {
        matches!(self, Self::Sample)
    }
}
