//! Submission repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{NewSubmission, Submission, SubmissionFilter, SubmissionOutcome},
};

/// Store for submission records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Create a new pending submission
    async fn create(&self, new: NewSubmission) -> AppResult<Submission>;

    /// Find submission by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Submission>>;

    /// Apply the terminal outcome to a pending submission in one update
    ///
    /// Fails if the submission is already terminal; a submission moves
    /// from `pending` to a terminal state exactly once.
    async fn finalize(&self, id: Uuid, outcome: SubmissionOutcome) -> AppResult<Submission>;

    /// All submissions for a contest, ordered by submission time ascending
    ///
    /// The order is load-bearing: it decides which submission counts as
    /// the first accept and which wrong attempts carry penalties.
    async fn list_for_contest(&self, contest_id: Uuid) -> AppResult<Vec<Submission>>;

    /// List submissions with pagination and filters
    async fn list(&self, filter: SubmissionFilter) -> AppResult<(Vec<Submission>, i64)>;
}

/// Postgres-backed submission repository
pub struct PgSubmissionRepository {
    pool: PgPool,
}

impl PgSubmissionRepository {
    /// Create a new repository over the shared pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionStore for PgSubmissionRepository {
    async fn create(&self, new: NewSubmission) -> AppResult<Submission> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions (
                user_id, problem_id, contest_id, language, source_code, test_cases_total
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(new.user_id)
        .bind(new.problem_id)
        .bind(new.contest_id)
        .bind(&new.language)
        .bind(&new.source_code)
        .bind(new.test_cases_total)
        .fetch_one(&self.pool)
        .await?;

        Ok(submission)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Submission>> {
        let submission =
            sqlx::query_as::<_, Submission>(r#"SELECT * FROM submissions WHERE id = $1"#)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(submission)
    }

    async fn finalize(&self, id: Uuid, outcome: SubmissionOutcome) -> AppResult<Submission> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            UPDATE submissions
            SET
                status = $2,
                test_cases_passed = $3,
                runtime_ms = $4,
                memory_kb = $5,
                error_message = $6,
                judged_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(outcome.status.as_str())
        .bind(outcome.test_cases_passed)
        .bind(outcome.runtime_ms)
        .bind(outcome.memory_kb)
        .bind(outcome.error_message.as_deref())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::Database(format!("submission {id} is not pending, refusing to re-judge"))
        })?;

        Ok(submission)
    }

    async fn list_for_contest(&self, contest_id: Uuid) -> AppResult<Vec<Submission>> {
        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT * FROM submissions
            WHERE contest_id = $1
            ORDER BY submitted_at ASC, id ASC
            "#,
        )
        .bind(contest_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }

    async fn list(&self, filter: SubmissionFilter) -> AppResult<(Vec<Submission>, i64)> {
        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT * FROM submissions
            WHERE
                ($1::uuid IS NULL OR user_id = $1)
                AND ($2::uuid IS NULL OR problem_id = $2)
                AND ($3::uuid IS NULL OR contest_id = $3)
            ORDER BY submitted_at DESC
            OFFSET $4 LIMIT $5
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.problem_id)
        .bind(filter.contest_id)
        .bind(filter.offset)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM submissions
            WHERE
                ($1::uuid IS NULL OR user_id = $1)
                AND ($2::uuid IS NULL OR problem_id = $2)
                AND ($3::uuid IS NULL OR contest_id = $3)
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.problem_id)
        .bind(filter.contest_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((submissions, count))
    }
}
