//! Submission response types

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{judge::CaseResult, models::Submission};

/// A submission as returned to clients
///
/// Source code is deliberately absent; clients that need it fetch the
/// problem editor state elsewhere.
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub problem_id: Uuid,
    pub contest_id: Option<Uuid>,
    pub language: String,
    pub status: String,
    pub test_cases_passed: i32,
    pub test_cases_total: i32,
    pub runtime_ms: f64,
    pub memory_kb: i64,
    pub error_message: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub judged_at: Option<DateTime<Utc>>,
}

impl From<Submission> for SubmissionResponse {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            problem_id: s.problem_id,
            contest_id: s.contest_id,
            language: s.language,
            status: s.status,
            test_cases_passed: s.test_cases_passed,
            test_cases_total: s.test_cases_total,
            runtime_ms: s.runtime_ms,
            memory_kb: s.memory_kb,
            error_message: s.error_message,
            submitted_at: s.submitted_at,
            judged_at: s.judged_at,
        }
    }
}

/// Paginated submission listing
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub submissions: Vec<SubmissionResponse>,
    pub total: i64,
}

/// Per-case results of a sample run
#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub results: Vec<CaseResult>,
}
