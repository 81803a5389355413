//! Contest handler functions

use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

use super::response::LeaderboardResponse;

/// Read the cached leaderboard snapshot
///
/// Serves the last computed standings without touching the submission log;
/// the cache may trail the latest judged submission by one recomputation.
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LeaderboardResponse>> {
    let contest = state
        .contests()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Contest {id}")))?;

    Ok(Json(LeaderboardResponse {
        contest_id: contest.id,
        contest_status: contest.status(),
        entries: contest.cached_entries(),
    }))
}

/// Force a full leaderboard recomputation
///
/// Normally recomputation happens after every judged contest submission;
/// this endpoint covers manual repair after data fixes.
pub async fn recompute_leaderboard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LeaderboardResponse>> {
    let contest = state
        .contests()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Contest {id}")))?;

    let entries = state.scoring().recompute(id).await?;

    Ok(Json(LeaderboardResponse {
        contest_id: contest.id,
        contest_status: contest.status(),
        entries,
    }))
}
