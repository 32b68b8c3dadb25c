//! Run orchestration: config fetch, server selection and throughput tests
//!
//! The pipeline is strictly sequential; every HTTP exchange completes
//! before the next starts, and one `reqwest::Client` with the configured
//! timeout is reused for all of them.

use crate::api::{build_http_client, SpeedtestApi, SpeedtestEndpoints};
use crate::error::{AppError, Result};
use crate::geo;
use crate::logging::Logger;
use crate::models::{ClientProfile, RunConfig, TestServer};
use crate::selection;
use crate::transfer;

/// Everything a completed run produced, ready for formatting.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub profile: ClientProfile,
    /// The selected server, with `distance` and `latency` populated
    pub server: TestServer,
    /// None when the run was latency-only
    pub download_mbps: Option<f64>,
    pub upload_mbps: Option<f64>,
}

/// What a run yields: either the full catalog (for `--list`) or a report.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    ServerList(Vec<TestServer>),
    Report(RunReport),
}

/// Execute a measurement run against the real speedtest.net endpoints.
pub async fn run(config: &RunConfig) -> Result<RunOutcome> {
    let logger = Logger::with_config("APP", config);
    let api = SpeedtestApi::new(config)?;
    run_with(config, &api, &logger).await
}

/// Execute a measurement run against any endpoint implementation.
pub async fn run_with(
    config: &RunConfig,
    api: &impl SpeedtestEndpoints,
    logger: &Logger,
) -> Result<RunOutcome> {
    let profile = api.fetch_config().await?;
    logger
        .info("Retrieved client profile")
        .field("ip", &profile.ip)
        .field("isp", &profile.isp)
        .log();

    let mut servers = api.fetch_servers().await?;
    logger
        .info("Retrieved server catalog")
        .field("servers", servers.len())
        .log();

    if config.list_servers {
        return Ok(RunOutcome::ServerList(servers));
    }

    let mut candidates = match &config.server_id {
        Some(id) => {
            let mut server = servers
                .iter()
                .find(|s| &s.id == id)
                .cloned()
                .ok_or_else(|| AppError::ServerNotFound(id.clone()))?;
            server.distance = geo::distance(profile.position, server.position);
            vec![server]
        }
        None => selection::nearest(config.num_closest, profile.position, &mut servers),
    };

    let client = build_http_client(config.timeout())?;
    let server = selection::fastest(&client, config.num_latency_runs, &mut candidates, logger).await?;
    logger
        .info(&format!("Selected {} ({})", server.name, server.sponsor))
        .field("server", &server.id)
        .field("latency_ms", server.latency)
        .field("distance_km", server.distance)
        .log();

    if config.ping_only {
        return Ok(RunOutcome::Report(RunReport {
            profile,
            server,
            download_mbps: None,
            upload_mbps: None,
        }));
    }

    let download_url = transfer::download_test_url(&server.url);
    let download_mbps = transfer::download_speed(&client, &download_url).await?;
    logger
        .info("Download test complete")
        .field("mbps", download_mbps)
        .log();

    let payload = transfer::upload_payload(crate::defaults::UPLOAD_BYTES);
    let upload_mbps =
        transfer::upload_speed(&client, &server.url, transfer::UPLOAD_CONTENT_TYPE, payload).await?;
    logger
        .info("Upload test complete")
        .field("mbps", upload_mbps)
        .log();

    Ok(RunOutcome::Report(RunReport {
        profile,
        server,
        download_mbps: Some(download_mbps),
        upload_mbps: Some(upload_mbps),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;
    use async_trait::async_trait;

    /// Canned endpoints for exercising orchestration without a network.
    struct StubEndpoints {
        profile: ClientProfile,
        servers: Vec<TestServer>,
    }

    #[async_trait]
    impl SpeedtestEndpoints for StubEndpoints {
        async fn fetch_config(&self) -> Result<ClientProfile> {
            Ok(self.profile.clone())
        }

        async fn fetch_servers(&self) -> Result<Vec<TestServer>> {
            Ok(self.servers.clone())
        }
    }

    fn stub() -> StubEndpoints {
        let make = |id: &str, lat: f64| TestServer {
            id: id.to_string(),
            // Closed port: latency probes fail fast and get penalized
            url: "http://127.0.0.1:9/speedtest/upload.php".to_string(),
            position: Position::new(lat, 0.0),
            name: format!("City {}", id),
            country: "Testland".to_string(),
            cc: "TL".to_string(),
            sponsor: "Sponsor".to_string(),
            distance: 0.0,
            latency: 0.0,
        };

        StubEndpoints {
            profile: ClientProfile {
                ip: "203.0.113.7".to_string(),
                position: Position::new(0.0, 0.0),
                isp: "Stub ISP".to_string(),
            },
            servers: vec![make("1", 30.0), make("2", 1.0), make("3", 15.0)],
        }
    }

    fn quiet_config() -> RunConfig {
        let mut config = RunConfig::default();
        config.enable_color = false;
        config.timeout_seconds = 2;
        config.num_latency_runs = 1;
        config
    }

    #[tokio::test]
    async fn test_list_servers_short_circuits() {
        let config = {
            let mut c = quiet_config();
            c.list_servers = true;
            c
        };
        let logger = Logger::with_config("TEST", &config);

        let outcome = run_with(&config, &stub(), &logger).await.unwrap();
        match outcome {
            RunOutcome::ServerList(servers) => assert_eq!(servers.len(), 3),
            RunOutcome::Report(_) => panic!("expected server list"),
        }
    }

    #[tokio::test]
    async fn test_ping_only_selects_nearest_candidate() {
        let config = {
            let mut c = quiet_config();
            c.ping_only = true;
            c.num_closest = 2;
            c
        };
        let logger = Logger::with_config("TEST", &config);

        let outcome = run_with(&config, &stub(), &logger).await.unwrap();
        match outcome {
            RunOutcome::Report(report) => {
                // All probes fail against the closed port, so the nearest
                // candidate wins at the penalty latency
                assert_eq!(report.server.id, "2");
                assert!(report.download_mbps.is_none());
                assert!(report.upload_mbps.is_none());
            }
            RunOutcome::ServerList(_) => panic!("expected report"),
        }
    }

    #[tokio::test]
    async fn test_unknown_server_id_is_error() {
        let config = {
            let mut c = quiet_config();
            c.server_id = Some("9999".to_string());
            c
        };
        let logger = Logger::with_config("TEST", &config);

        let result = run_with(&config, &stub(), &logger).await;
        assert!(matches!(result, Err(AppError::ServerNotFound(ref id)) if id == "9999"));
    }

    #[tokio::test]
    async fn test_server_id_lookup_populates_distance() {
        let config = {
            let mut c = quiet_config();
            c.server_id = Some("1".to_string());
            c.ping_only = true;
            c
        };
        let logger = Logger::with_config("TEST", &config);

        let outcome = run_with(&config, &stub(), &logger).await.unwrap();
        match outcome {
            RunOutcome::Report(report) => {
                assert_eq!(report.server.id, "1");
                assert!(report.server.distance > 0.0);
            }
            RunOutcome::ServerList(_) => panic!("expected report"),
        }
    }
}
