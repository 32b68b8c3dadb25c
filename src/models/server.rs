//! Client profile and candidate server data models

use serde::{Deserialize, Serialize};

/// A latitude/longitude point. Immutable once obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude in degrees, [-90, 90]
    pub lat: f64,
    /// Longitude in degrees, [-180, 180]
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// The caller's own network position as reported by the configuration
/// endpoint. Created once per run and read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientProfile {
    /// Public IP address
    pub ip: String,
    /// Geographic position the service attributes to the IP
    pub position: Position,
    /// ISP name
    pub isp: String,
}

/// A measurement server advertised by the server-list endpoint.
///
/// `distance` is populated by the distance-ranking pass and `latency` by
/// the latency-selection pass; both start at zero and must not be read
/// before their pass has run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestServer {
    /// Server identifier from the listing
    pub id: String,
    /// Base URL of the server's test endpoint (ends in an upload script path)
    pub url: String,
    /// Server position
    pub position: Position,
    /// Display name (usually the city)
    pub name: String,
    pub country: String,
    /// Two-letter country code
    pub cc: String,
    /// Sponsor organization
    pub sponsor: String,
    /// Great-circle distance from the client, kilometers
    pub distance: f64,
    /// Minimum observed round-trip latency, milliseconds
    pub latency: f64,
}

impl TestServer {
    /// One-line human description, matching the list output format.
    pub fn describe(&self) -> String {
        format!("{} ({}, {})", self.sponsor, self.name, self.country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_format() {
        let server = TestServer {
            id: "5005".to_string(),
            url: "http://host.example.com/speedtest/upload.php".to_string(),
            position: Position::new(40.0, -75.0),
            name: "Philadelphia".to_string(),
            country: "United States".to_string(),
            cc: "US".to_string(),
            sponsor: "Example ISP".to_string(),
            distance: 0.0,
            latency: 0.0,
        };
        assert_eq!(server.describe(), "Example ISP (Philadelphia, United States)");
    }
}
