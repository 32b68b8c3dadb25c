//! Run configuration data model and validation

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for a single measurement run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Configuration endpoint URL
    #[serde(default = "default_config_url")]
    pub config_url: String,

    /// Server-list endpoint URL
    #[serde(default = "default_servers_url")]
    pub servers_url: String,

    /// How many distance-ranked servers to latency probe
    #[serde(default = "default_num_closest")]
    pub num_closest: usize,

    /// Latency probe attempts per server
    #[serde(default = "default_num_runs")]
    pub num_latency_runs: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// Test only the server with this listing id, skipping selection
    #[serde(default)]
    pub server_id: Option<String>,

    /// Report latency only, skip the transfer tests
    #[serde(default)]
    pub ping_only: bool,

    /// Print the full server list and exit
    #[serde(default)]
    pub list_servers: bool,

    /// Machine-readable one-line output
    #[serde(default)]
    pub report_mode: bool,

    /// Field separator for report mode
    #[serde(default = "default_report_char")]
    pub report_char: String,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            config_url: default_config_url(),
            servers_url: default_servers_url(),
            num_closest: default_num_closest(),
            num_latency_runs: default_num_runs(),
            timeout_seconds: default_timeout_secs(),
            server_id: None,
            ping_only: false,
            list_servers: false,
            report_mode: false,
            report_char: default_report_char(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        for (label, endpoint) in [("config", &self.config_url), ("servers", &self.servers_url)] {
            if endpoint.is_empty() {
                return Err(AppError::config(format!("{} endpoint URL cannot be empty", label)));
            }
            if let Err(e) = url::Url::parse(endpoint) {
                return Err(AppError::config(format!(
                    "Invalid {} endpoint URL '{}': {}",
                    label, endpoint, e
                )));
            }
        }

        if self.num_latency_runs == 0 {
            return Err(AppError::config("Latency run count must be greater than 0"));
        }

        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > 300 {
            return Err(AppError::config("Timeout cannot exceed 300 seconds"));
        }

        if self.report_char.is_empty() {
            return Err(AppError::config("Report separator cannot be empty"));
        }

        Ok(())
    }

    /// Merge endpoint overrides from the environment. The numeric settings
    /// are handled by clap's env fallback; the endpoint URLs are merged
    /// here so library callers get the same override behavior as the CLI.
    pub fn merge_from_env(&mut self) {
        if let Ok(config_url) = std::env::var("SPEEDTEST_CONFIG_URL") {
            self.config_url = config_url;
        }

        if let Ok(servers_url) = std::env::var("SPEEDTEST_SERVERS_URL") {
            self.servers_url = servers_url;
        }
    }
}

// Default value functions for serde
fn default_config_url() -> String {
    crate::defaults::CONFIG_URL.to_string()
}

fn default_servers_url() -> String {
    crate::defaults::SERVERS_URL.to_string()
}

fn default_num_closest() -> usize {
    crate::defaults::NUM_CLOSEST
}

fn default_num_runs() -> u32 {
    crate::defaults::NUM_LATENCY_RUNS
}

fn default_timeout_secs() -> u64 {
    crate::defaults::REQUEST_TIMEOUT.as_secs()
}

fn default_report_char() -> String {
    crate::defaults::REPORT_CHAR.to_string()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
