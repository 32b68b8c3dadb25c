//! Internet Speed Tester
//!
//! Measures internet connection quality against the speedtest.net server
//! network: fetches the client's network position and the candidate server
//! list, ranks candidates by great-circle distance, probes the nearest
//! subset for round-trip latency and measures sustained download/upload
//! throughput against the selected server.

pub mod api;
pub mod app;
pub mod cli;
pub mod error;
pub mod geo;
pub mod logging;
pub mod models;
pub mod output;
pub mod selection;
pub mod transfer;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{ClientProfile, Position, RunConfig, TestServer};
pub use selection::{fastest, measure_latency, nearest, FAILED_PROBE_PENALTY};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    /// speedtest.net endpoint serving the caller's own network position.
    pub const CONFIG_URL: &str = "http://www.speedtest.net/speedtest-config.php";
    /// speedtest.net endpoint serving the candidate server list.
    pub const SERVERS_URL: &str = "http://www.speedtest.net/speedtest-servers.php";

    /// How many distance-ranked servers get latency probed.
    pub const NUM_CLOSEST: usize = 3;
    /// Latency probe attempts per candidate server.
    pub const NUM_LATENCY_RUNS: u32 = 5;
    /// Per-request timeout. The original tool had none; a hung remote
    /// server would stall the whole run indefinitely.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

    /// Field separator for machine-readable report output.
    pub const REPORT_CHAR: &str = "|";

    /// Payload size posted during the upload test.
    pub const UPLOAD_BYTES: usize = 1_000_000;

    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
