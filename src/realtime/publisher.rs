//! Leaderboard publishers
//!
//! After every recomputation the scoring engine hands the fresh standings to
//! a publisher. Publishing is strictly best-effort: a dead Redis connection
//! must never fail a submission or a recompute, so the trait is infallible
//! and the Redis implementation logs and swallows its own errors.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use uuid::Uuid;

use crate::models::LeaderboardEntry;

/// Sink for freshly computed leaderboards
#[async_trait]
pub trait LeaderboardPublisher: Send + Sync {
    /// Broadcast the new standings for a contest
    async fn publish(&self, contest_id: Uuid, entries: &[LeaderboardEntry]);
}

/// Redis pub/sub publisher
///
/// Broadcasts on `contest:{id}:leaderboard` so websocket gateways and other
/// subscribers can push updates without polling Postgres.
pub struct RedisLeaderboardPublisher {
    conn: ConnectionManager,
}

impl RedisLeaderboardPublisher {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    fn channel(contest_id: Uuid) -> String {
        format!("contest:{contest_id}:leaderboard")
    }
}

#[async_trait]
impl LeaderboardPublisher for RedisLeaderboardPublisher {
    async fn publish(&self, contest_id: Uuid, entries: &[LeaderboardEntry]) {
        let payload = match serde_json::to_string(entries) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Failed to serialize leaderboard for {}: {}", contest_id, e);
                return;
            }
        };

        // ConnectionManager clones share the underlying multiplexed connection
        let mut conn = self.conn.clone();
        if let Err(e) = redis::cmd("PUBLISH")
            .arg(Self::channel(contest_id))
            .arg(payload)
            .query_async::<()>(&mut conn)
            .await
        {
            tracing::warn!("Failed to publish leaderboard for {}: {}", contest_id, e);
        }
    }
}

/// Publisher that drops every update
///
/// Used when Redis is unavailable at startup; evaluation and scoring keep
/// working, clients just fall back to polling the cached leaderboard.
pub struct NoopPublisher;

#[async_trait]
impl LeaderboardPublisher for NoopPublisher {
    async fn publish(&self, _contest_id: Uuid, _entries: &[LeaderboardEntry]) {}
}
