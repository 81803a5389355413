//! Submission model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Submission database model
///
/// A submission is append-only: it is created in `pending` state and moved
/// to exactly one terminal state by a single update. Re-submission always
/// creates a new row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub problem_id: Uuid,
    pub contest_id: Option<Uuid>,
    pub language: String,
    #[serde(skip_serializing)]
    pub source_code: String,
    pub status: String,
    pub test_cases_passed: i32,
    pub test_cases_total: i32,
    /// Total runtime across accepted cases, in milliseconds
    pub runtime_ms: f64,
    /// Peak memory across accepted cases, in kilobytes
    pub memory_kb: i64,
    pub error_message: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub judged_at: Option<DateTime<Utc>>,
}

impl Submission {
    /// Check if judging has completed for this submission
    pub fn is_terminal(&self) -> bool {
        SubmissionStatus::from_str(&self.status).is_some_and(|s| s.is_terminal())
    }

    /// Check if this submission solved the problem
    pub fn is_accepted(&self) -> bool {
        self.status == SubmissionStatus::Accepted.as_str()
    }

    /// Check the verdict invariant: accepted iff every case passed and
    /// the test suite was non-empty.
    pub fn verdict_is_consistent(&self) -> bool {
        let full_pass = self.test_cases_passed == self.test_cases_total && self.test_cases_total > 0;
        self.is_accepted() == full_pass
    }
}

/// Submission status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Accepted,
    Wrong,
    Error,
}

impl SubmissionStatus {
    /// Get status as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Wrong => "wrong",
            Self::Error => "error",
        }
    }

    /// Parse status from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "wrong" => Some(Self::Wrong),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Check if this is a terminal status (judging complete)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fields for creating a new pending submission
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub user_id: Uuid,
    pub problem_id: Uuid,
    pub contest_id: Option<Uuid>,
    pub language: String,
    pub source_code: String,
    pub test_cases_total: i32,
}

/// Terminal outcome applied to a pending submission in one update
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub status: SubmissionStatus,
    pub test_cases_passed: i32,
    pub runtime_ms: f64,
    pub memory_kb: i64,
    pub error_message: Option<String>,
}

/// Filters for submission listing
#[derive(Debug, Clone, Default)]
pub struct SubmissionFilter {
    pub user_id: Option<Uuid>,
    pub problem_id: Option<Uuid>,
    pub contest_id: Option<Uuid>,
    pub offset: i64,
    pub limit: i64,
}
