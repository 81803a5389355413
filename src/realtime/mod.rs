//! Realtime leaderboard fan-out

pub mod publisher;

pub use publisher::{LeaderboardPublisher, NoopPublisher, RedisLeaderboardPublisher};
