//! Wire structures for the speedtest.net XML payloads
//!
//! Both payloads are attribute-only documents. Latitude/longitude arrive
//! as decimal strings and are converted to floats during the mapping into
//! the crate's models.

use crate::error::Result;
use crate::models::{ClientProfile, Position, TestServer};
use serde::Deserialize;

/// `<settings><client ip=".." lat=".." lon=".." isp=".."/></settings>`
#[derive(Debug, Deserialize)]
pub struct ConfigSettings {
    pub client: ClientElement,
}

#[derive(Debug, Deserialize)]
pub struct ClientElement {
    #[serde(rename = "@ip")]
    pub ip: String,
    #[serde(rename = "@lat")]
    pub lat: String,
    #[serde(rename = "@lon")]
    pub lon: String,
    #[serde(rename = "@isp")]
    pub isp: String,
}

/// `<settings><servers><server .../>...</servers></settings>`
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    pub servers: ServersElement,
}

#[derive(Debug, Deserialize)]
pub struct ServersElement {
    #[serde(rename = "server", default)]
    pub list: Vec<ServerElement>,
}

#[derive(Debug, Deserialize)]
pub struct ServerElement {
    #[serde(rename = "@url")]
    pub url: String,
    #[serde(rename = "@lat")]
    pub lat: String,
    #[serde(rename = "@lon")]
    pub lon: String,
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@country")]
    pub country: String,
    #[serde(rename = "@cc")]
    pub cc: String,
    #[serde(rename = "@sponsor")]
    pub sponsor: String,
    #[serde(rename = "@id")]
    pub id: String,
}

/// Parse the configuration payload into a [`ClientProfile`].
pub fn parse_client_profile(body: &str) -> Result<ClientProfile> {
    let settings: ConfigSettings = quick_xml::de::from_str(body)?;
    Ok(ClientProfile {
        ip: settings.client.ip,
        position: Position::new(settings.client.lat.parse()?, settings.client.lon.parse()?),
        isp: settings.client.isp,
    })
}

/// Parse the server-list payload, preserving the order of the source
/// document. `distance` and `latency` start at zero and are filled in by
/// the ranking and selection passes.
pub fn parse_server_list(body: &str) -> Result<Vec<TestServer>> {
    let settings: ServerSettings = quick_xml::de::from_str(body)?;
    let mut servers = Vec::with_capacity(settings.servers.list.len());
    for entry in settings.servers.list {
        servers.push(TestServer {
            id: entry.id,
            url: entry.url,
            position: Position::new(entry.lat.parse()?, entry.lon.parse()?),
            name: entry.name,
            country: entry.country,
            cc: entry.cc,
            sponsor: entry.sponsor,
            distance: 0.0,
            latency: 0.0,
        });
    }
    Ok(servers)
}
