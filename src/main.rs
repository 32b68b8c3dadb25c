//! Internet Speed Tester - CLI entry point

use clap::Parser;
use internet_speed_tester::{
    app::{self, RunOutcome},
    cli::Cli,
    error::Result,
    output::Formatter,
    PKG_NAME, VERSION,
};
use std::process;

#[tokio::main]
async fn main() {
    // Pick up a local .env before clap resolves env-backed arguments
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(1);
    }

    if let Err(e) = run_application(cli).await {
        eprintln!("{}", e.format_for_console(true));
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    let config = cli.into_config()?;

    if config.debug {
        println!("{} v{}", PKG_NAME, VERSION);
        println!("  Config endpoint: {}", config.config_url);
        println!("  Servers endpoint: {}", config.servers_url);
        println!("  Closest servers: {}", config.num_closest);
        println!("  Latency runs: {}", config.num_latency_runs);
        println!("  Timeout: {}s", config.timeout_seconds);
        println!();
    }

    let formatter = Formatter::from_config(&config);

    match app::run(&config).await? {
        RunOutcome::ServerList(servers) => {
            println!("{}", formatter.server_list(&servers));
        }
        RunOutcome::Report(report) => {
            println!("{}", formatter.run_report(&report));
        }
    }

    Ok(())
}
