//! User repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppResult, models::User};

/// Store for user records and the per-user solved set
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Record a solved problem (idempotent set insert)
    async fn add_solved_problem(&self, user_id: Uuid, problem_id: Uuid) -> AppResult<()>;
}

/// Postgres-backed user repository
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new repository over the shared pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn add_solved_problem(&self, user_id: Uuid, problem_id: Uuid) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_solved_problems (user_id, problem_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(problem_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
