//! Judge wire types and the status-id lookup table

use serde::{Deserialize, Serialize, Serializer};

/// One test case as sent to the judge
#[derive(Debug, Clone, Serialize)]
pub struct JudgeCase {
    pub source_code: String,
    pub language_id: u32,
    pub stdin: String,
    pub expected_output: String,
    /// CPU time limit in seconds
    pub cpu_time_limit: f64,
    /// Memory limit in kilobytes
    pub memory_limit: i64,
}

/// Batch submit request body
#[derive(Debug, Serialize)]
pub struct BatchSubmitRequest {
    pub submissions: Vec<JudgeCase>,
}

/// One created case in the batch submit response
#[derive(Debug, Deserialize)]
pub struct CreatedCase {
    pub token: String,
}

/// One case in the batch status response, as the judge reports it
#[derive(Debug, Deserialize)]
pub struct RawCaseResult {
    pub status_id: i32,
    /// Execution time in seconds, as a decimal string
    #[serde(default)]
    pub time: Option<String>,
    /// Peak memory in kilobytes
    #[serde(default)]
    pub memory: Option<i64>,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Batch status response body
#[derive(Debug, Deserialize)]
pub struct BatchStatusResponse {
    pub submissions: Vec<RawCaseResult>,
}

/// Judge status-id table
///
/// The id assignment is an external contract: 1-2 are non-terminal,
/// 3 is accepted, 4 is a runtime error and the remaining categories
/// follow. Ids outside the table are judge-side failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStatus {
    InQueue,
    Processing,
    Accepted,
    RuntimeError,
    WrongAnswer,
    TimeLimitExceeded,
    CompilationError,
    JudgeError(i32),
}

impl CaseStatus {
    /// Decode a judge status id
    pub fn from_id(id: i32) -> Self {
        match id {
            1 => Self::InQueue,
            2 => Self::Processing,
            3 => Self::Accepted,
            4 => Self::RuntimeError,
            5 => Self::WrongAnswer,
            6 => Self::TimeLimitExceeded,
            7 => Self::CompilationError,
            other => Self::JudgeError(other),
        }
    }

    /// Check whether the case has finished judging
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InQueue | Self::Processing)
    }

    /// Get status as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InQueue => "in_queue",
            Self::Processing => "processing",
            Self::Accepted => "accepted",
            Self::RuntimeError => "runtime_error",
            Self::WrongAnswer => "wrong_answer",
            Self::TimeLimitExceeded => "time_limit_exceeded",
            Self::CompilationError => "compilation_error",
            Self::JudgeError(_) => "judge_error",
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for CaseStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Parsed per-case judge result
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub status: CaseStatus,
    /// Execution time in milliseconds (0 when the judge reported none)
    pub time_ms: f64,
    /// Peak memory in kilobytes (0 when the judge reported none)
    pub memory_kb: i64,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub message: Option<String>,
}

impl From<RawCaseResult> for CaseResult {
    fn from(raw: RawCaseResult) -> Self {
        let time_ms = raw
            .time
            .as_deref()
            .and_then(|t| t.parse::<f64>().ok())
            .map(|secs| secs * 1000.0)
            .unwrap_or(0.0);

        Self {
            status: CaseStatus::from_id(raw.status_id),
            time_ms,
            memory_kb: raw.memory.unwrap_or(0),
            stdout: raw.stdout,
            stderr: raw.stderr,
            message: raw.message,
        }
    }
}
