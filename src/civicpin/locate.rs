//! Coarse "where am I" lookups from the caller's public IP address.

use crate::config::CivicConfig;
use crate::error::{CivicError, Result};
use crate::model::Coordinates;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Approximate current position of the user.
pub trait Locator {
    /// `Ok(None)` when the service answered without a position.
    fn locate(&self) -> Result<Option<Coordinates>>;
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

/// Locator backed by the ip-api.com JSON endpoint.
pub struct IpApiLocator {
    client: Client,
    endpoint: String,
}

impl IpApiLocator {
    pub fn new(endpoint: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| CivicError::Lookup(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &CivicConfig) -> Result<Self> {
        Self::new(&config.locator_url, &config.user_agent, config.lookup_timeout())
    }
}

impl Locator for IpApiLocator {
    fn locate(&self) -> Result<Option<Coordinates>> {
        debug!(endpoint = %self.endpoint, "looking up approximate location");
        let body: IpApiResponse = self
            .client
            .get(&self.endpoint)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json())
            .map_err(|e| CivicError::Lookup(e.to_string()))?;

        if body.status != "success" {
            return Ok(None);
        }
        Ok(match (body.lat, body.lon) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        })
    }
}
