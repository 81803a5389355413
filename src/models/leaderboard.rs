//! Leaderboard models
//!
//! Leaderboard entries are derived data: they are only ever produced by a
//! full recomputation over the submission log and persisted inside the
//! contest's cached snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One participant's row in a contest leaderboard snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based dense rank by sorted position
    pub rank: i32,
    pub user_id: Uuid,
    pub username: String,
    /// Count of distinct problems with at least one accepted submission
    pub problems_solved: i32,
    /// Sum of solve times plus wrong-attempt penalties, in minutes
    pub total_time: i64,
    /// Per-problem progress, keyed by problem id (ordered for stable output)
    pub problems: BTreeMap<Uuid, ProblemProgress>,
}

impl LeaderboardEntry {
    /// Seed an accumulator for a participant with no submissions yet
    pub fn seed(user_id: Uuid, username: String) -> Self {
        Self {
            rank: 0,
            user_id,
            username,
            problems_solved: 0,
            total_time: 0,
            problems: BTreeMap::new(),
        }
    }
}

/// Per-problem scoring state for one participant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemProgress {
    /// Wrong attempts before the first accept
    pub attempts: i64,
    pub solved: bool,
    /// Minutes from contest start to the first accept
    pub solve_time_minutes: i64,
}
