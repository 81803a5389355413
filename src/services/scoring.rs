//! Contest scoring engine
//!
//! The leaderboard is never patched incrementally. Every recomputation folds
//! the contest's full submission log, in submission order, into fresh
//! standings, then overwrites the cached snapshot and broadcasts the result.
//! Recomputing after any prefix of the log yields the same standings as
//! recomputing once at the end.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::repositories::{ContestStore, SubmissionStore},
    error::AppResult,
    models::{LeaderboardEntry, Participant, Submission},
    realtime::LeaderboardPublisher,
    utils::time::minutes_between,
};

/// Recomputes and persists contest leaderboards
pub struct ScoringEngine {
    contests: Arc<dyn ContestStore>,
    submissions: Arc<dyn SubmissionStore>,
    publisher: Arc<dyn LeaderboardPublisher>,
    penalty_minutes: i64,
}

impl ScoringEngine {
    /// Create a new scoring engine
    pub fn new(
        contests: Arc<dyn ContestStore>,
        submissions: Arc<dyn SubmissionStore>,
        publisher: Arc<dyn LeaderboardPublisher>,
        penalty_minutes: i64,
    ) -> Self {
        Self {
            contests,
            submissions,
            publisher,
            penalty_minutes,
        }
    }

    /// Recompute a contest's leaderboard from scratch and persist it
    ///
    /// An unknown contest id is a no-op: evaluation may race with contest
    /// deletion and a submission must not fail over a vanished leaderboard.
    pub async fn recompute(&self, contest_id: Uuid) -> AppResult<Vec<LeaderboardEntry>> {
        let Some(contest) = self.contests.find_by_id(contest_id).await? else {
            tracing::warn!(%contest_id, "Leaderboard recompute requested for unknown contest");
            return Ok(Vec::new());
        };

        let participants = self.contests.participants(contest_id).await?;
        let submissions = self.submissions.list_for_contest(contest_id).await?;

        let entries = compute_leaderboard(
            contest.start_time,
            &participants,
            &submissions,
            self.penalty_minutes,
        );

        self.contests
            .replace_leaderboard(contest_id, &entries)
            .await?;
        self.publisher.publish(contest_id, &entries).await;

        tracing::debug!(
            %contest_id,
            participants = entries.len(),
            submissions = submissions.len(),
            "Leaderboard recomputed"
        );

        Ok(entries)
    }
}

/// Fold a contest's submission log into ranked standings
///
/// Submissions must arrive in (submitted_at, id) ascending order; the fold
/// decides first accepts and penalty attempts purely by position. Rows from
/// users who never registered are ignored, as are rows still pending when a
/// concurrent evaluation triggered this recomputation.
pub fn compute_leaderboard(
    contest_start: DateTime<Utc>,
    participants: &[Participant],
    submissions: &[Submission],
    penalty_minutes: i64,
) -> Vec<LeaderboardEntry> {
    let mut board: HashMap<Uuid, LeaderboardEntry> = participants
        .iter()
        .map(|p| (p.user_id, LeaderboardEntry::seed(p.user_id, p.username.clone())))
        .collect();

    for submission in submissions {
        let Some(entry) = board.get_mut(&submission.user_id) else {
            continue;
        };
        if !submission.is_terminal() {
            continue;
        }

        let progress = entry.problems.entry(submission.problem_id).or_default();
        if progress.solved {
            // Everything after the first accept is ignored, including
            // further wrong attempts.
            continue;
        }

        if submission.is_accepted() {
            progress.solved = true;
            progress.solve_time_minutes = minutes_between(contest_start, submission.submitted_at);
            entry.problems_solved += 1;
            entry.total_time += progress.solve_time_minutes + progress.attempts * penalty_minutes;
        } else {
            progress.attempts += 1;
        }
    }

    let mut entries: Vec<LeaderboardEntry> = board.into_values().collect();
    entries.sort_by(|a, b| {
        b.problems_solved
            .cmp(&a.problems_solved)
            .then_with(|| a.total_time.cmp(&b.total_time))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    // Dense ranks: ties on (solved, time) share a rank
    let mut rank = 0;
    let mut prev_key = None;
    for entry in entries.iter_mut() {
        let key = (entry.problems_solved, entry.total_time);
        if prev_key != Some(key) {
            rank += 1;
            prev_key = Some(key);
        }
        entry.rank = rank;
    }

    entries
}
