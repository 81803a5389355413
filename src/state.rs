//! Shared application state

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    db::repositories::{ContestStore, SubmissionStore},
    services::{ScoringEngine, SubmissionEvaluator},
};

/// Application state shared across all request handlers
///
/// Cheap to clone; everything lives behind one [`Arc`].
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    db: PgPool,
    evaluator: SubmissionEvaluator,
    scoring: Arc<ScoringEngine>,
    contests: Arc<dyn ContestStore>,
    submissions: Arc<dyn SubmissionStore>,
}

impl AppState {
    /// Assemble the shared state
    pub fn new(
        db: PgPool,
        evaluator: SubmissionEvaluator,
        scoring: Arc<ScoringEngine>,
        contests: Arc<dyn ContestStore>,
        submissions: Arc<dyn SubmissionStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                db,
                evaluator,
                scoring,
                contests,
                submissions,
            }),
        }
    }

    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub fn evaluator(&self) -> &SubmissionEvaluator {
        &self.inner.evaluator
    }

    pub fn scoring(&self) -> &ScoringEngine {
        &self.inner.scoring
    }

    pub fn contests(&self) -> &dyn ContestStore {
        self.inner.contests.as_ref()
    }

    pub fn submissions(&self) -> &dyn SubmissionStore {
        self.inner.submissions.as_ref()
    }
}
