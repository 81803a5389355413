//! Contest repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Contest, LeaderboardEntry, Participant},
};

/// Store for contest records and the cached leaderboard
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContestStore: Send + Sync {
    /// Find contest by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Contest>>;

    /// Registered participants of a contest
    async fn participants(&self, contest_id: Uuid) -> AppResult<Vec<Participant>>;

    /// Check whether a user is registered for a contest
    async fn is_participant(&self, contest_id: Uuid, user_id: Uuid) -> AppResult<bool>;

    /// Check whether a problem belongs to a contest
    async fn has_problem(&self, contest_id: Uuid, problem_id: Uuid) -> AppResult<bool>;

    /// Replace the cached leaderboard snapshot in a single write
    ///
    /// The cache is always overwritten wholesale, never patched in place.
    async fn replace_leaderboard(
        &self,
        contest_id: Uuid,
        entries: &[LeaderboardEntry],
    ) -> AppResult<()>;
}

/// Postgres-backed contest repository
pub struct PgContestRepository {
    pool: PgPool,
}

impl PgContestRepository {
    /// Create a new repository over the shared pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContestStore for PgContestRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Contest>> {
        let contest = sqlx::query_as::<_, Contest>(r#"SELECT * FROM contests WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(contest)
    }

    async fn participants(&self, contest_id: Uuid) -> AppResult<Vec<Participant>> {
        let participants = sqlx::query_as::<_, Participant>(
            r#"
            SELECT cp.user_id, u.username
            FROM contest_participants cp
            JOIN users u ON cp.user_id = u.id
            WHERE cp.contest_id = $1
            ORDER BY cp.registered_at
            "#,
        )
        .bind(contest_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(participants)
    }

    async fn is_participant(&self, contest_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM contest_participants
                WHERE contest_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(contest_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn has_problem(&self, contest_id: Uuid, problem_id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM contest_problems
                WHERE contest_id = $1 AND problem_id = $2
            )
            "#,
        )
        .bind(contest_id)
        .bind(problem_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn replace_leaderboard(
        &self,
        contest_id: Uuid,
        entries: &[LeaderboardEntry],
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE contests
            SET cached_leaderboard = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(contest_id)
        .bind(serde_json::to_value(entries)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
