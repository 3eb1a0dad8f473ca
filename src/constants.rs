//! Application-wide constants and configuration values
//!
//! This module centralizes the fixed thresholds used by the serve/run deriver
//! together with the HTTP, polling and cache defaults of the host.

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 16;

/// Default interval between live snapshot polls in seconds
pub const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 10;

/// Number of live poll ticks between reference collection refreshes
pub const REFERENCE_REFRESH_EVERY_TICKS: u64 = 30;

/// Serve/run emphasis thresholds. Fixed, not configurable.
pub mod serve {
    /// Run length at which the serving indicator turns "hot"
    pub const HOT_RUN: u32 = 2;

    /// Run length at which the hot indicator also blinks
    pub const BLINKING_HOT_RUN: u32 = 4;

    /// Run length at which a new point is labelled a break-point rather than a side-out
    pub const BREAK_POINT_RUN: u32 = 2;
}

/// Tracked federation defaults
pub mod federation {
    /// Team country literal that marks a team as belonging to the tracked federation
    pub const DEFAULT_COUNTRY: &str = "Norway";

    /// Lower-case substring of a player's nationality that marks them as tracked
    pub const DEFAULT_DEMONYM: &str = "norw";
}

/// Display placeholders
pub mod display {
    /// Tournament name used when every fallback comes up empty
    pub const UNKNOWN_TOURNAMENT: &str = "Ukjent turnering";
}

/// Cache sizing and TTL values
pub mod cache {
    /// Maximum number of cached HTTP responses (reference collections only)
    pub const HTTP_RESPONSE_CAPACITY: usize = 32;

    /// TTL for cached reference collection responses (1 hour)
    pub const REFERENCE_DATA_SECONDS: u64 = 3600;
}

/// Retry behaviour of the fetch layer
pub mod retry {
    /// Maximum retry attempts for transient failures
    pub const MAX_RETRIES: u32 = 3;

    /// Initial backoff in milliseconds, doubled after every attempt
    pub const INITIAL_BACKOFF_MS: u64 = 250;
}

/// Environment variable names
pub mod env_vars {
    /// Override API domain
    pub const API_DOMAIN: &str = "VOLLEY_API_DOMAIN";

    /// Override log file path
    pub const LOG_FILE: &str = "VOLLEY_LOG_FILE";

    /// Override HTTP timeout
    pub const HTTP_TIMEOUT: &str = "VOLLEY_HTTP_TIMEOUT";

    /// Override poll interval
    pub const POLL_INTERVAL: &str = "VOLLEY_POLL_INTERVAL";
}
