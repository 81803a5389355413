//! Database repositories
//!
//! Repositories handle all direct database interactions. Each repository
//! implements a store trait so the evaluator and the scoring engine can be
//! exercised against test doubles; the Postgres implementations are the
//! only ones used at runtime.

pub mod contest_repo;
pub mod problem_repo;
pub mod submission_repo;
pub mod user_repo;

pub use contest_repo::{ContestStore, PgContestRepository};
pub use problem_repo::{PgProblemRepository, ProblemStore};
pub use submission_repo::{PgSubmissionRepository, SubmissionStore};
pub use user_repo::{PgUserRepository, UserStore};

#[cfg(test)]
pub use contest_repo::MockContestStore;
#[cfg(test)]
pub use problem_repo::MockProblemStore;
#[cfg(test)]
pub use submission_repo::MockSubmissionStore;
#[cfg(test)]
pub use user_repo::MockUserStore;
