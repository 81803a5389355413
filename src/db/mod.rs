//! Database layer
//!
//! Connection pooling, embedded migrations, and the repositories. Each
//! repository sits behind a store trait so the evaluator and the scoring
//! engine depend on the seam rather than on Postgres; the Pg
//! implementations in [`repositories`] are the only ones used at runtime.

pub mod connection;
pub mod repositories;

use sqlx::PgPool;

pub use connection::*;

/// Apply embedded migrations
///
/// The schema ships inside the binary; a freshly created database is
/// ready right after boot, no external migration step needed.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
