//! Contest model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::leaderboard::LeaderboardEntry;

/// Contest database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Contest {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_published: bool,
    /// Derived cache of the last computed leaderboard. Never authoritative:
    /// the scoring engine can recompute and overwrite it at any time.
    pub cached_leaderboard: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contest {
    /// Get current status of the contest
    pub fn status(&self) -> ContestStatus {
        let now = Utc::now();
        if now < self.start_time {
            ContestStatus::Upcoming
        } else if now < self.end_time {
            ContestStatus::Ongoing
        } else {
            ContestStatus::Ended
        }
    }

    /// Decode the cached leaderboard snapshot
    ///
    /// A malformed cache decodes to an empty board rather than failing;
    /// the next recomputation overwrites it anyway.
    pub fn cached_entries(&self) -> Vec<LeaderboardEntry> {
        serde_json::from_value(self.cached_leaderboard.clone()).unwrap_or_default()
    }
}

/// Contest status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContestStatus {
    Upcoming,
    Ongoing,
    Ended,
}

impl std::fmt::Display for ContestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upcoming => write!(f, "upcoming"),
            Self::Ongoing => write!(f, "ongoing"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

/// Contest participant as seen by the scoring engine
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: Uuid,
    pub username: String,
}
