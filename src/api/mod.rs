//! speedtest.net API access: client configuration and the server catalog

pub mod xml;

use crate::error::{AppError, Result};
use crate::models::{ClientProfile, RunConfig, TestServer};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Seam over the two remote API fetches, so orchestration can be written
/// against the contract rather than a concrete HTTP client.
#[async_trait]
pub trait SpeedtestEndpoints: Send + Sync {
    /// Retrieve the caller's own network position (IP, position, ISP).
    async fn fetch_config(&self) -> Result<ClientProfile>;

    /// Retrieve the full candidate server list, in payload order.
    async fn fetch_servers(&self) -> Result<Vec<TestServer>>;
}

/// HTTP client for the speedtest.net endpoints.
///
/// Both fetches share the fatal-failure contract: a connect error, non-200
/// status, unreadable body or unparsable payload aborts the run with an
/// error naming the endpoint and the failure class.
pub struct SpeedtestApi {
    client: Client,
    config_url: String,
    servers_url: String,
}

impl SpeedtestApi {
    /// Create an API client with the configured endpoints and timeout.
    pub fn new(config: &RunConfig) -> Result<Self> {
        let client = build_http_client(config.timeout())?;
        Ok(Self {
            client,
            config_url: config.config_url.clone(),
            servers_url: config.servers_url.clone(),
        })
    }

    async fn fetch_body(&self, url: &str, stage: fn(String, String) -> AppError) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| stage(url.to_string(), format!("cannot create connection: {}", e)))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(stage(url.to_string(), format!("HTTP status {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| stage(url.to_string(), format!("cannot read body: {}", e)))
    }
}

#[async_trait]
impl SpeedtestEndpoints for SpeedtestApi {
    async fn fetch_config(&self) -> Result<ClientProfile> {
        let body = self
            .fetch_body(&self.config_url, |url, cause| AppError::ConfigFetch { url, cause })
            .await?;

        xml::parse_client_profile(&body).map_err(|e| {
            AppError::config_fetch(self.config_url.as_str(), format!("cannot parse payload: {}", e))
        })
    }

    async fn fetch_servers(&self) -> Result<Vec<TestServer>> {
        let body = self
            .fetch_body(&self.servers_url, |url, cause| AppError::ServerList { url, cause })
            .await?;

        xml::parse_server_list(&body).map_err(|e| {
            AppError::server_list(self.servers_url.as_str(), format!("cannot parse payload: {}", e))
        })
    }
}

/// Build the reqwest client shared by every exchange in a run.
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("internet-speed-tester/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> RunConfig {
        let mut config = RunConfig::default();
        config.config_url = format!("{}/speedtest-config.php", server.uri());
        config.servers_url = format!("{}/speedtest-servers.php", server.uri());
        config.timeout_seconds = 5;
        config
    }

    #[tokio::test]
    async fn test_fetch_config_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/speedtest-config.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<settings><client ip="198.51.100.9" lat="51.5" lon="-0.12" isp="Test ISP"/></settings>"#,
            ))
            .mount(&mock_server)
            .await;

        let api = SpeedtestApi::new(&config_for(&mock_server)).unwrap();
        let profile = api.fetch_config().await.unwrap();
        assert_eq!(profile.ip, "198.51.100.9");
        assert_eq!(profile.isp, "Test ISP");
    }

    #[tokio::test]
    async fn test_fetch_config_non_200_is_fatal() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/speedtest-config.php"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let api = SpeedtestApi::new(&config_for(&mock_server)).unwrap();
        let error = api.fetch_config().await.unwrap_err();
        assert!(matches!(error, AppError::ConfigFetch { .. }));
        assert!(error.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_fetch_config_unparsable_payload() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/speedtest-config.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<settings><nope/></settings>"))
            .mount(&mock_server)
            .await;

        let api = SpeedtestApi::new(&config_for(&mock_server)).unwrap();
        let error = api.fetch_config().await.unwrap_err();
        assert!(matches!(error, AppError::ConfigFetch { .. }));
        assert!(error.to_string().contains("cannot parse payload"));
    }

    #[tokio::test]
    async fn test_fetch_config_connect_error() {
        // Nothing listens on this port
        let mut config = RunConfig::default();
        config.config_url = "http://127.0.0.1:9/speedtest-config.php".to_string();
        config.timeout_seconds = 2;

        let api = SpeedtestApi::new(&config).unwrap();
        let error = api.fetch_config().await.unwrap_err();
        assert!(matches!(error, AppError::ConfigFetch { .. }));
        assert!(error.to_string().contains("cannot create connection"));
    }

    #[tokio::test]
    async fn test_fetch_servers_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/speedtest-servers.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<settings><servers>
                    <server url="http://a.example.com/speedtest/upload.php" lat="1.0" lon="2.0" name="A" country="X" cc="XX" sponsor="S1" id="1"/>
                    <server url="http://b.example.com/speedtest/upload.php" lat="3.0" lon="4.0" name="B" country="Y" cc="YY" sponsor="S2" id="2"/>
                </servers></settings>"#,
            ))
            .mount(&mock_server)
            .await;

        let api = SpeedtestApi::new(&config_for(&mock_server)).unwrap();
        let servers = api.fetch_servers().await.unwrap();
        assert_eq!(servers.len(), 2);
        assert_eq!(servers[0].id, "1");
        assert_eq!(servers[1].name, "B");
    }

    #[tokio::test]
    async fn test_fetch_servers_non_200_is_fatal() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/speedtest-servers.php"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let api = SpeedtestApi::new(&config_for(&mock_server)).unwrap();
        let error = api.fetch_servers().await.unwrap_err();
        assert!(matches!(error, AppError::ServerList { .. }));
        assert_eq!(error.category(), "SERVER_LIST");
    }
}
