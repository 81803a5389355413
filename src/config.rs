//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::sync::LazyLock;
use std::time::Duration;

use crate::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_JUDGE_POLL_INTERVAL_MS,
    DEFAULT_JUDGE_POLL_TIMEOUT_SECS, DEFAULT_JUDGE_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    ICPC_PENALTY_MINUTES,
};
use crate::judge::languages::LanguageMap;

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub judge: JudgeConfig,
    pub contest: ContestConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

/// Remote judge service configuration
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    /// Base URL of the judge API
    pub base_url: String,
    /// API key header value, if the deployment requires one
    pub api_key: Option<String>,
    /// API host header value, if the deployment requires one
    pub api_host: Option<String>,
    /// Interval between result polls
    pub poll_interval_ms: u64,
    /// Ceiling on the whole polling loop before giving up
    pub poll_timeout_secs: u64,
    /// Language name to judge language id table
    pub languages: LanguageMap,
}

/// Contest scoring configuration
#[derive(Debug, Clone)]
pub struct ContestConfig {
    /// Minutes added per wrong attempt before the first accept
    pub penalty_minutes: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            judge: JudgeConfig::from_env()?,
            contest: ContestConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DEFAULT_DATABASE_MAX_CONNECTIONS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string()))?,
        })
    }
}

impl RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        })
    }
}

impl JudgeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let languages = match env::var("JUDGE_LANGUAGES") {
            Ok(spec) => LanguageMap::parse(&spec)
                .map_err(|_| ConfigError::InvalidValue("JUDGE_LANGUAGES".to_string()))?,
            Err(_) => LanguageMap::with_defaults(),
        };

        Ok(Self {
            base_url: env::var("JUDGE_URL").unwrap_or_else(|_| DEFAULT_JUDGE_URL.to_string()),
            api_key: env::var("JUDGE_API_KEY").ok(),
            api_host: env::var("JUDGE_API_HOST").ok(),
            poll_interval_ms: env::var("JUDGE_POLL_INTERVAL_MS")
                .unwrap_or_else(|_| DEFAULT_JUDGE_POLL_INTERVAL_MS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JUDGE_POLL_INTERVAL_MS".to_string()))?,
            poll_timeout_secs: env::var("JUDGE_POLL_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_JUDGE_POLL_TIMEOUT_SECS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JUDGE_POLL_TIMEOUT_SECS".to_string()))?,
            languages,
        })
    }

    /// Interval between result polls
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Deadline for the whole polling loop
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }
}

impl ContestConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            penalty_minutes: env::var("CONTEST_PENALTY_MINUTES")
                .unwrap_or_else(|_| ICPC_PENALTY_MINUTES.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CONTEST_PENALTY_MINUTES".to_string()))?,
        })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        // Test that defaults are applied when env vars are not set
        let server = ServerConfig {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            rust_log: "info".to_string(),
        };
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }

    #[test]
    fn test_judge_poll_durations() {
        let judge = JudgeConfig {
            base_url: DEFAULT_JUDGE_URL.to_string(),
            api_key: None,
            api_host: None,
            poll_interval_ms: DEFAULT_JUDGE_POLL_INTERVAL_MS,
            poll_timeout_secs: DEFAULT_JUDGE_POLL_TIMEOUT_SECS,
            languages: LanguageMap::with_defaults(),
        };
        assert_eq!(judge.poll_interval(), Duration::from_secs(1));
        assert_eq!(judge.poll_timeout(), Duration::from_secs(120));
    }
}
