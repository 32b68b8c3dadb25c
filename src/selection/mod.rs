//! Server selection: distance ranking, latency probing and best-server pick

use crate::error::{AppError, Result};
use crate::geo;
use crate::logging::Logger;
use crate::models::{Position, TestServer};
use reqwest::Client;
use std::time::{Duration, Instant};

/// Latency assigned to a failed probe attempt. Large enough that it can
/// never be mistaken for a real round trip and never wins the minimum
/// against any successful attempt.
pub const FAILED_PROBE_PENALTY: Duration = Duration::from_secs(60);

/// Exact body the latency endpoint must return, after whitespace trimming.
const LATENCY_TOKEN: &str = "test=test";

/// Well-known probe filename served next to the server's upload script.
const LATENCY_FILE: &str = "latency.txt";

/// Rank servers by great-circle distance from the client and return the
/// `n` nearest.
///
/// Every entry's `distance` field is populated in place, so callers
/// sharing the slice observe the enrichment. The slice is stable-sorted
/// ascending by distance (equal distances keep their payload order) and
/// the first `min(n, len)` entries are returned. `n == 0` yields an empty
/// vector.
pub fn nearest(n: usize, client: Position, servers: &mut [TestServer]) -> Vec<TestServer> {
    for server in servers.iter_mut() {
        server.distance = geo::distance(client, server.position);
    }

    servers.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    servers.iter().take(n).cloned().collect()
}

/// Derive a server's latency probe URL: the base URL with its final path
/// segment replaced by the well-known probe filename.
///
/// `http://x.example.com/speedtest/upload.php` becomes
/// `http://x.example.com/speedtest/latency.txt`.
pub fn latency_url(server_url: &str) -> String {
    match server_url.rsplit_once('/') {
        Some((base, _)) => format!("{}/{}", base, LATENCY_FILE),
        None => format!("{}/{}", server_url, LATENCY_FILE),
    }
}

/// Measure a server's round-trip latency in milliseconds: the minimum
/// across `runs` probe attempts.
///
/// A probe attempt fails on connect error, unreadable body, or a body that
/// is not the expected token; failed attempts contribute
/// [`FAILED_PROBE_PENALTY`] instead of aborting, so selection proceeds on
/// whichever attempts succeeded. If every attempt fails the result is the
/// penalty itself. Min-of-N rejects jitter outliers that would drag an
/// average high.
pub async fn measure_latency(client: &Client, server: &TestServer, runs: u32, logger: &Logger) -> f64 {
    let url = latency_url(&server.url);
    let penalty_ms = FAILED_PROBE_PENALTY.as_secs_f64() * 1000.0;
    let mut best_ms = penalty_ms;

    for attempt in 1..=runs {
        let start = Instant::now();
        let run_ms = match probe_once(client, &url).await {
            Ok(body) if body.trim() == LATENCY_TOKEN => start.elapsed().as_secs_f64() * 1000.0,
            Ok(_) => {
                logger
                    .warn(&format!("Latency probe of '{}' returned unexpected body", url))
                    .field("server", &server.id)
                    .field("attempt", attempt)
                    .log();
                penalty_ms
            }
            Err(cause) => {
                logger
                    .warn(&format!("Cannot test latency of '{}': {}", url, cause))
                    .field("server", &server.id)
                    .field("attempt", attempt)
                    .log();
                penalty_ms
            }
        };

        if run_ms < best_ms {
            best_ms = run_ms;
        }

        logger
            .debug(&format!("Latency run {}/{} for {}", attempt, runs, server.name))
            .field("run_ms", run_ms)
            .field("best_ms", best_ms)
            .log();
    }

    best_ms
}

async fn probe_once(client: &Client, url: &str) -> std::result::Result<String, String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| format!("cannot contact server: {}", e))?;
    response.text().await.map_err(|e| format!("cannot read body: {}", e))
}

/// Probe every candidate and return the one with the lowest measured
/// latency.
///
/// Each entry's `latency` field is populated in place; the slice is
/// stable-sorted ascending by latency and the first entry is returned by
/// value. An empty candidate set is an error. When every probe of every
/// candidate failed the candidates are all tied at the penalty value, the
/// first one wins, and a warning is emitted.
pub async fn fastest(
    client: &Client,
    runs: u32,
    servers: &mut [TestServer],
    logger: &Logger,
) -> Result<TestServer> {
    if servers.is_empty() {
        return Err(AppError::NoCandidates);
    }

    for server in servers.iter_mut() {
        let latency = measure_latency(client, server, runs, logger).await;
        server.latency = latency;
        logger
            .info(&format!("Measured {} ({})", server.name, server.sponsor))
            .field("server", &server.id)
            .field("latency_ms", latency)
            .log();
    }

    servers.sort_by(|a, b| a.latency.total_cmp(&b.latency));

    let penalty_ms = FAILED_PROBE_PENALTY.as_secs_f64() * 1000.0;
    if servers.iter().all(|s| s.latency >= penalty_ms) {
        logger
            .warn("Every latency probe of every candidate failed; selection degraded to list order")
            .field("candidates", servers.len())
            .log();
    }

    Ok(servers[0].clone())
}
