use std::env;
use std::time::Duration;

pub const DEFAULT_DEVICE_URL: &str = "http://192.168.4.1";
pub const DEFAULT_DEVICE_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Process-level settings, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub device_url: String,
    pub device_timeout: Duration,
    pub http_addr: String,
    pub history_capacity: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let device_url = lookup("DEVICE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_DEVICE_URL.to_string());
        let timeout_ms: u64 = lookup("DEVICE_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_DEVICE_TIMEOUT_MS);
        let http_addr = lookup("HTTP_ADDR").unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let history_capacity: usize = lookup("HISTORY_CAPACITY")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_HISTORY_CAPACITY)
            .max(1);

        Self {
            device_url,
            device_timeout: Duration::from_millis(timeout_ms),
            http_addr,
            history_capacity,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
