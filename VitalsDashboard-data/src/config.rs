//! Runtime configuration for the backend client
//!
//! Everything is read from environment variables. A single base-URL setting
//! selects the backend; without it the dashboard runs against the built-in
//! demonstration dataset and never touches the network.

use std::env;
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable holding the backend base URL
pub const API_URL_VAR: &str = "VITALS_API_URL";
/// Environment variable holding the per-request timeout in seconds
pub const API_TIMEOUT_VAR: &str = "VITALS_API_TIMEOUT_SECS";
/// Environment variable holding the connectivity poll period in seconds
pub const PROBE_INTERVAL_VAR: &str = "VITALS_PROBE_INTERVAL_SECS";

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Default connectivity poll period
pub const DEFAULT_PROBE_INTERVAL_SECS: u64 = 30;
/// Default trailing window for the raw vitals endpoint
pub const DEFAULT_VITALS_DAYS: u32 = 5;
/// Default trailing window for the chart endpoint
pub const DEFAULT_GRAPH_DAYS: u32 = 14;

/// Where patient data comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A real backend reachable at the given base URL (no trailing slash)
    Remote(String),
    /// The fixed in-memory demonstration dataset
    Demo,
}

impl DataSource {
    /// Short label used in logs and health reports
    pub fn label(&self) -> &'static str {
        match self {
            DataSource::Remote(_) => "remote",
            DataSource::Demo => "demo",
        }
    }
}

/// Backend client configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Selected data source
    pub source: DataSource,
    /// Per-request timeout
    pub timeout: Duration,
    /// Period between connectivity probes
    pub probe_interval: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Demo,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            probe_interval: Duration::from_secs(DEFAULT_PROBE_INTERVAL_SECS),
        }
    }
}

impl DashboardConfig {
    /// Configuration pointing at a remote backend, other settings defaulted
    pub fn remote(base_url: impl Into<String>) -> Self {
        Self {
            source: DataSource::Remote(normalize_base_url(&base_url.into())),
            ..Self::default()
        }
    }

    /// Create a new configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = match lookup(API_URL_VAR) {
            Some(url) if !url.trim().is_empty() => {
                let url = normalize_base_url(&url);
                info!("Using backend at {}", url);
                DataSource::Remote(url)
            }
            _ => {
                info!("{} is not set, serving the demonstration dataset", API_URL_VAR);
                DataSource::Demo
            }
        };

        let timeout = read_secs(&lookup, API_TIMEOUT_VAR, DEFAULT_TIMEOUT_SECS);
        let probe_interval = read_secs(&lookup, PROBE_INTERVAL_VAR, DEFAULT_PROBE_INTERVAL_SECS);

        info!(
            "Client configuration: source={}, timeout={}s, probe_interval={}s",
            source.label(),
            timeout.as_secs(),
            probe_interval.as_secs()
        );

        Self {
            source,
            timeout,
            probe_interval,
        }
    }

    /// Whether the demonstration dataset is in use
    pub fn is_demo(&self) -> bool {
        self.source == DataSource::Demo
    }
}

fn read_secs<F>(lookup: &F, key: &str, default: u64) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    let secs = match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(0) | Err(_) => {
                warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
                default
            }
            Ok(value) => value,
        },
    };
    Duration::from_secs(secs)
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
