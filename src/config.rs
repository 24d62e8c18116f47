//! Configuration for the client core.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use nutritrack::config::{ApiConfig, ClientConfig};
//!
//! // Use defaults
//! let config = ClientConfig::default();
//! assert_eq!(config.api.request_timeout, Duration::from_secs(10));
//!
//! // Or point at another backend
//! let config = ClientConfig {
//!     api: ApiConfig {
//!         base_url: "http://10.0.2.2:8000/api".to_owned(),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//! ```

use std::env;
use std::time::Duration;

/// Backend used by development builds.
pub const DEVELOPMENT_API_URL: &str = "http://localhost:8000/api";

/// Backend used by release builds.
pub const PRODUCTION_API_URL: &str = "https://nutritrack-api.railway.app/api";

/// Every request is bounded by this unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Top-level configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub queries: QueryConfig,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Local backend, default timeouts.
    pub fn development() -> Self {
        Self::default()
    }

    /// Hosted backend, default timeouts.
    pub fn production() -> Self {
        Self {
            api: ApiConfig {
                base_url: PRODUCTION_API_URL.to_owned(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Reads `NUTRITRACK_API_URL` and `NUTRITRACK_REQUEST_TIMEOUT_SECS`,
    /// falling back to the development defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        match env::var("NUTRITRACK_API_URL") {
            Ok(url) if !url.trim().is_empty() => {
                config.api.base_url = url.trim().trim_end_matches('/').to_owned();
            }
            _ => log::info!(
                target: "nutritrack",
                "msg=\"NUTRITRACK_API_URL not set, using default\" url={}",
                config.api.base_url
            ),
        }

        if let Ok(raw) = env::var("NUTRITRACK_REQUEST_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.api.request_timeout = Duration::from_secs(secs),
                _ => log::warn!(
                    target: "nutritrack",
                    "msg=\"invalid NUTRITRACK_REQUEST_TIMEOUT_SECS, using default\" value={raw}"
                ),
            }
        }

        config
    }
}

/// Request executor settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to, without trailing slash.
    ///
    /// Default: [`DEVELOPMENT_API_URL`]
    pub base_url: String,

    /// Upper bound for a single request, including reading the body.
    ///
    /// Default: 10 seconds
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEVELOPMENT_API_URL.to_owned(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Query cache settings.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Staleness window for reads that do not declare their own.
    ///
    /// Default: 5 minutes
    pub default_stale_time: Duration,

    /// Extra attempts for a failing read. Mutations are never retried.
    ///
    /// Default: 2
    pub read_retries: u32,

    /// Delay before the first retry; doubles on each further attempt.
    ///
    /// Default: 1 second
    pub retry_delay: Duration,

    /// How long a stale value is kept before it is evicted. Keeps one-off
    /// keys (search terms, past dates) from piling up.
    ///
    /// Default: 5 minutes
    pub gc_time: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_stale_time: Duration::from_secs(5 * 60),
            read_retries: 2,
            retry_delay: Duration::from_secs(1),
            gc_time: Duration::from_secs(5 * 60),
        }
    }
}
