//! Resolution of where and how long to call back into the host.
//!
//! # Design
//! `HostConfig::resolve` takes the variable lookup as an argument so tests
//! can feed a map instead of mutating the process environment.
//! `HostConfig::from_env` is the production wiring over `std::env::var`.

use std::time::Duration;

/// Variable naming the host's base URL.
pub const HOST_ENV_VAR: &str = "HOST";

/// Variable overriding the callback timeout, in milliseconds.
pub const TIMEOUT_ENV_VAR: &str = "PLUGIN_HTTP_TIMEOUT_MS";

pub const DEFAULT_HOST_URL: &str = "http://127.0.0.1:3000";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub host_url: String,
    /// Upper bound for each host callback.
    pub timeout: Duration,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            host_url: DEFAULT_HOST_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl HostConfig {
    /// Build a config from `lookup`. Blank values count as unset; a timeout
    /// that is not a positive integer falls back to `DEFAULT_TIMEOUT`.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host_url = non_blank(HOST_ENV_VAR)
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_HOST_URL.to_string());

        let timeout = match non_blank(TIMEOUT_ENV_VAR) {
            None => DEFAULT_TIMEOUT,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    log::warn!(
                        "ignoring invalid {TIMEOUT_ENV_VAR}={raw:?}, using {}ms",
                        DEFAULT_TIMEOUT.as_millis()
                    );
                    DEFAULT_TIMEOUT
                }
            },
        };

        Self { host_url, timeout }
    }

    pub fn from_env() -> Self {
        Self::resolve(|key| std::env::var(key).ok())
    }
}
