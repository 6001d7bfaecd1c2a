//! Configuration Module
//!
//! Handles loading and managing driver configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Driver configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL in seconds for fetched pages
    pub cache_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Record input/output history for accounted operations
    pub track_history: bool,
    /// Share one producer call between concurrent misses of the same key
    pub single_flight: bool,
    /// Timeout in seconds for remote fetches
    pub fetch_timeout: u64,
    /// Flush the whole store once at startup
    pub flush_on_start: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL` - Page cache TTL in seconds (default: 10)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 1)
    /// - `TRACK_HISTORY` - Record call history (default: true)
    /// - `SINGLE_FLIGHT` - De-duplicate concurrent misses (default: false)
    /// - `FETCH_TIMEOUT` - Remote fetch timeout in seconds (default: 30)
    /// - `FLUSH_ON_START` - Reset the store at startup (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_ttl: env_or("CACHE_TTL", defaults.cache_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            track_history: env_or("TRACK_HISTORY", defaults.track_history),
            single_flight: env_or("SINGLE_FLIGHT", defaults.single_flight),
            fetch_timeout: env_or("FETCH_TIMEOUT", defaults.fetch_timeout),
            flush_on_start: env_or("FLUSH_ON_START", defaults.flush_on_start),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl: 10,
            server_port: 3000,
            cleanup_interval: 1,
            track_history: true,
            single_flight: false,
            fetch_timeout: 30,
            flush_on_start: true,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
