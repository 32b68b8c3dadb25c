//! Command-line interface

use crate::error::Result;
use crate::models::RunConfig;
use clap::Parser;

/// Internet Speed Tester - measures latency and throughput against the
/// speedtest.net server network
#[derive(Parser, Debug, Clone)]
#[command(name = "ist")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// List all advertised servers and exit
    #[arg(short, long)]
    pub list: bool,

    /// Test latency only, skip the download/upload tests
    #[arg(short, long)]
    pub ping: bool,

    /// Test against a specific server id instead of auto-selecting
    #[arg(short, long, value_name = "ID")]
    pub server: Option<String>,

    /// How many of the nearest servers to latency probe
    #[arg(long, env = "NUM_CLOSEST", default_value_t = crate::defaults::NUM_CLOSEST)]
    pub numclosest: usize,

    /// Latency probe attempts per server
    #[arg(long, env = "NUM_RUNS", default_value_t = crate::defaults::NUM_LATENCY_RUNS)]
    pub numruns: u32,

    /// Per-request timeout in seconds
    #[arg(short, long, env = "TIMEOUT_SECONDS", default_value_t = crate::defaults::REQUEST_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Machine-readable one-line output
    #[arg(long)]
    pub report: bool,

    /// Field separator for report output
    #[arg(long, value_name = "CHAR", default_value = crate::defaults::REPORT_CHAR)]
    pub reportchar: String,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts before any network traffic
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.list && self.server.is_some() {
            return Err("Cannot combine --list with --server".to_string());
        }

        if self.list && self.ping {
            return Err("Cannot combine --list with --ping".to_string());
        }

        if self.numruns == 0 {
            return Err("--numruns must be at least 1".to_string());
        }

        Ok(())
    }

    /// Build the validated run configuration from the parsed arguments.
    pub fn into_config(self) -> Result<RunConfig> {
        let mut config = RunConfig {
            num_closest: self.numclosest,
            num_latency_runs: self.numruns,
            timeout_seconds: self.timeout,
            server_id: self.server,
            ping_only: self.ping,
            list_servers: self.list,
            report_mode: self.report,
            report_char: self.reportchar,
            enable_color: !self.no_color && !self.report,
            verbose: self.verbose,
            debug: self.debug,
            ..RunConfig::default()
        };

        config.merge_from_env();
        config.validate()?;
        Ok(config)
    }
}
