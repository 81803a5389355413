//! Problem repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Problem, SuiteKind, TestCase},
};

/// Store for problems and their test suites
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProblemStore: Send + Sync {
    /// Find problem by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Problem>>;

    /// Test cases of the requested suite, in problem order
    async fn test_cases(&self, problem_id: Uuid, suite: SuiteKind) -> AppResult<Vec<TestCase>>;
}

/// Postgres-backed problem repository
pub struct PgProblemRepository {
    pool: PgPool,
}

impl PgProblemRepository {
    /// Create a new repository over the shared pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProblemStore for PgProblemRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Problem>> {
        let problem = sqlx::query_as::<_, Problem>(r#"SELECT * FROM problems WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(problem)
    }

    async fn test_cases(&self, problem_id: Uuid, suite: SuiteKind) -> AppResult<Vec<TestCase>> {
        let cases = sqlx::query_as::<_, TestCase>(
            r#"
            SELECT * FROM test_cases
            WHERE problem_id = $1 AND is_sample = $2
            ORDER BY "order"
            "#,
        )
        .bind(problem_id)
        .bind(suite.is_sample())
        .fetch_all(&self.pool)
        .await?;

        Ok(cases)
    }
}
