//! Contest response types

use serde::Serialize;
use uuid::Uuid;

use crate::models::{ContestStatus, LeaderboardEntry};

/// Leaderboard as returned to clients
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub contest_id: Uuid,
    pub contest_status: ContestStatus,
    pub entries: Vec<LeaderboardEntry>,
}
