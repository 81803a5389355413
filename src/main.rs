//! CodeArena - Application Entry Point
//!
//! This is the main entry point for the CodeArena judging server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use redis::Client as RedisClient;
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codearena::{
    config::CONFIG,
    db::{
        self,
        repositories::{
            PgContestRepository, PgProblemRepository, PgSubmissionRepository, PgUserRepository,
        },
    },
    handlers,
    judge::HttpJudgeClient,
    realtime::{LeaderboardPublisher, NoopPublisher, RedisLeaderboardPublisher},
    services::{ScoringEngine, SubmissionEvaluator},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CodeArena server...");

    // Initialize database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&CONFIG.database).await?;

    // Run database migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&db_pool).await?;

    // Initialize the leaderboard publisher. Redis being down degrades
    // realtime fan-out to a no-op; judging keeps working.
    let publisher: Arc<dyn LeaderboardPublisher> = match connect_redis().await {
        Ok(conn) => {
            tracing::info!("Connected to Redis");
            Arc::new(RedisLeaderboardPublisher::new(conn))
        }
        Err(e) => {
            tracing::warn!("Redis unavailable, leaderboard fan-out disabled: {}", e);
            Arc::new(NoopPublisher)
        }
    };

    // Build repositories and services
    let submissions = Arc::new(PgSubmissionRepository::new(db_pool.clone()));
    let problems = Arc::new(PgProblemRepository::new(db_pool.clone()));
    let users = Arc::new(PgUserRepository::new(db_pool.clone()));
    let contests = Arc::new(PgContestRepository::new(db_pool.clone()));
    let judge = Arc::new(HttpJudgeClient::new(CONFIG.judge.clone()));

    let scoring = Arc::new(ScoringEngine::new(
        contests.clone(),
        submissions.clone(),
        publisher,
        CONFIG.contest.penalty_minutes,
    ));
    let evaluator = SubmissionEvaluator::new(
        submissions.clone(),
        problems,
        users,
        contests.clone(),
        judge,
        scoring.clone(),
        CONFIG.judge.languages.clone(),
    );

    // Create application state
    let state = AppState::new(db_pool, evaluator, scoring, contests, submissions);

    // Build the router
    let app = Router::new()
        .nest("/api/v1", handlers::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start the server
    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn connect_redis() -> anyhow::Result<redis::aio::ConnectionManager> {
    let client = RedisClient::open(CONFIG.redis.url.as_str())?;
    Ok(redis::aio::ConnectionManager::new(client).await?)
}
