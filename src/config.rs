//! Client configuration.
//!
//! Settings come from the builder, optionally seeded from the environment:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `WRITEFLOW_API_URL` | `http://localhost:8000/api/v1` |
//! | `WRITEFLOW_IDLE_TIMEOUT_SECS` | `120` (`0` disables) |
//! | `WRITEFLOW_SNAPSHOT_DEBOUNCE_MS` | `250` |
//! | `WRITEFLOW_HISTORY_CAPACITY` | `5` |
//! | `WRITEFLOW_DATA_DIR` | platform data directory + `/writeflow` |

use std::path::PathBuf;
use std::time::Duration;

use crate::snapshot::DEFAULT_SNAPSHOT_DEBOUNCE;
use crate::state::DEFAULT_HISTORY_CAPACITY;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(120);

pub const ENV_API_URL: &str = "WRITEFLOW_API_URL";
pub const ENV_IDLE_TIMEOUT_SECS: &str = "WRITEFLOW_IDLE_TIMEOUT_SECS";
pub const ENV_SNAPSHOT_DEBOUNCE_MS: &str = "WRITEFLOW_SNAPSHOT_DEBOUNCE_MS";
pub const ENV_HISTORY_CAPACITY: &str = "WRITEFLOW_HISTORY_CAPACITY";
pub const ENV_DATA_DIR: &str = "WRITEFLOW_DATA_DIR";

/// Configuration for a [`GenerationClient`](crate::generation::GenerationClient)
/// and the session it drives.
///
/// # Example
///
/// ```ignore
/// use writeflow::config::ClientConfig;
///
/// let config = ClientConfig::from_env()
///     .with_idle_timeout(Some(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Service base URL, without trailing slash
    pub base_url: String,
    /// Longest wait for the next chunk; `None` waits forever
    pub idle_timeout: Option<Duration>,
    pub snapshot_debounce: Duration,
    pub history_capacity: usize,
    /// Override for the file store directory
    pub data_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            idle_timeout: Some(DEFAULT_IDLE_TIMEOUT),
            snapshot_debounce: DEFAULT_SNAPSHOT_DEBOUNCE,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            data_dir: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn with_snapshot_debounce(mut self, debounce: Duration) -> Self {
        self.snapshot_debounce = debounce;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Defaults overridden by any `WRITEFLOW_*` variables that are set.
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(url.trim());
        }

        if let Some(secs) = parse_var::<u64>(&lookup, ENV_IDLE_TIMEOUT_SECS) {
            config.idle_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(ms) = parse_var::<u64>(&lookup, ENV_SNAPSHOT_DEBOUNCE_MS) {
            config.snapshot_debounce = Duration::from_millis(ms);
        }

        if let Some(capacity) = parse_var::<usize>(&lookup, ENV_HISTORY_CAPACITY) {
            config.history_capacity = capacity;
        }

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|d| !d.trim().is_empty()) {
            config.data_dir = Some(PathBuf::from(dir));
        }

        config
    }

    pub fn stream_url(&self) -> String {
        format!("{}/writing/stream", self.base_url)
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }
}

fn parse_var<T: std::str::FromStr>(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring invalid configuration value");
            None
        }
    }
}
