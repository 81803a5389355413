//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// JUDGE SERVICE DEFAULTS
// =============================================================================

/// Default base URL for the remote judge service
pub const DEFAULT_JUDGE_URL: &str = "https://judge0-ce.p.rapidapi.com";

/// Default interval between result polls, in milliseconds
pub const DEFAULT_JUDGE_POLL_INTERVAL_MS: u64 = 1000;

/// Default ceiling on the whole polling loop, in seconds
pub const DEFAULT_JUDGE_POLL_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// CONTEST SCORING
// =============================================================================

/// Penalty time for each wrong attempt before a correct solve (in minutes)
pub const ICPC_PENALTY_MINUTES: i64 = 20;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for paginated results
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum page size for paginated results
pub const MAX_PAGE_SIZE: u32 = 100;

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum source code size in bytes (1 MB)
pub const MAX_SOURCE_CODE_SIZE: u64 = 1024 * 1024;
