//! Throughput measurement: timed bulk download and upload

use crate::error::{AppError, Result};
use reqwest::Client;
use std::time::{Duration, Instant};

/// Sized download artifact served next to the server's upload script.
const DOWNLOAD_FILE: &str = "random1500x1500.jpg";

/// Content type posted during the upload test.
pub const UPLOAD_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Throughput in megabits per second for `bytes` transferred over
/// `elapsed`. Decimal megabits: 1 megabit = 1,000,000 bits.
pub fn mbps(bytes: usize, elapsed: Duration) -> f64 {
    let bits = bytes as f64 * 8.0;
    bits / 1_000_000.0 / elapsed.as_secs_f64()
}

/// Measure download throughput: one GET, body fully read, wall time
/// around the whole exchange. Connect and read failures are fatal; there
/// is no retry at this layer.
pub async fn download_speed(client: &Client, url: &str) -> Result<f64> {
    let start = Instant::now();

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::download(url, format!("cannot contact server: {}", e)))?;

    let data = response
        .bytes()
        .await
        .map_err(|e| AppError::download(url, format!("cannot read body: {}", e)))?;

    let elapsed = start.elapsed();
    Ok(mbps(data.len(), elapsed))
}

/// Measure upload throughput: one POST of `payload`, response read and
/// discarded, wall time around the whole exchange. The payload length is
/// the transferred byte count. Same fatal-failure policy as download.
pub async fn upload_speed(client: &Client, url: &str, content_type: &str, payload: Vec<u8>) -> Result<f64> {
    let byte_count = payload.len();
    let start = Instant::now();

    let response = client
        .post(url)
        .header(reqwest::header::CONTENT_TYPE, content_type)
        .body(payload)
        .send()
        .await
        .map_err(|e| AppError::upload(url, format!("cannot contact server: {}", e)))?;

    response
        .bytes()
        .await
        .map_err(|e| AppError::upload(url, format!("cannot read body: {}", e)))?;

    let elapsed = start.elapsed();
    Ok(mbps(byte_count, elapsed))
}

/// Derive a server's download test URL: the base URL with its final path
/// segment replaced by the sized download artifact.
pub fn download_test_url(server_url: &str) -> String {
    match server_url.rsplit_once('/') {
        Some((base, _)) => format!("{}/{}", base, DOWNLOAD_FILE),
        None => format!("{}/{}", server_url, DOWNLOAD_FILE),
    }
}

/// Deterministic ASCII payload for the upload test.
pub fn upload_payload(size: usize) -> Vec<u8> {
    const PATTERN: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    PATTERN.iter().copied().cycle().take(size).collect()
}
