//! Configuration Module
//!
//! Loads server and stat cache settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name reported by the served bucket
    pub bucket_name: String,
    /// How long a stat result may be served from cache, in seconds
    pub stat_cache_ttl: u64,
    /// Maximum number of records the stat cache holds
    pub stat_cache_capacity: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Interval between expired-entry sweeps, in seconds
    pub sweep_interval: u64,
}

fn var_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `BUCKET_NAME` - Bucket name (default: "local")
    /// - `STAT_CACHE_TTL` - Stat cache TTL in seconds (default: 60)
    /// - `STAT_CACHE_CAPACITY` - Maximum cached records (default: 4096)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Expiry sweep frequency in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bucket_name: env::var("BUCKET_NAME")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.bucket_name),
            stat_cache_ttl: var_or("STAT_CACHE_TTL", defaults.stat_cache_ttl),
            stat_cache_capacity: var_or("STAT_CACHE_CAPACITY", defaults.stat_cache_capacity)
                .max(1),
            server_port: var_or("SERVER_PORT", defaults.server_port),
            sweep_interval: var_or("SWEEP_INTERVAL", defaults.sweep_interval).max(1),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.stat_cache_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket_name: "local".to_string(),
            stat_cache_ttl: 60,
            stat_cache_capacity: crate::cache::DEFAULT_CAPACITY,
            server_port: 3000,
            sweep_interval: 30,
        }
    }
}
