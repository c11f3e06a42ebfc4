//! # Geocoding
//!
//! Turning a free-text address into coordinates. The [`Geocoder`] trait is the
//! seam to the external service; [`NominatimGeocoder`] is the production
//! implementation and [`GeocodeCache`] memoizes its answers.
//!
//! Geocoding is strictly best-effort. Every caller must be ready for "no
//! coordinates" and fall back to something it already knows.

use crate::config::CivicConfig;
use crate::error::{CivicError, Result};
use crate::model::Coordinates;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::cell::Cell;
use std::collections::HashMap;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Address to coordinates lookup.
pub trait Geocoder {
    /// `Ok(None)` when the service answered but found nothing; `Err` when
    /// the service could not be asked or answered garbage.
    fn geocode(&self, address: &str) -> Result<Option<Coordinates>>;
}

/// Nominatim search result; coordinates come back as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Geocoder backed by a Nominatim-compatible `/search` endpoint.
///
/// Requests are spaced at least `min_delay` apart, as the public Nominatim
/// usage policy asks.
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
    min_delay: Duration,
    last_request: Cell<Option<Instant>>,
}

impl NominatimGeocoder {
    pub fn new(endpoint: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| CivicError::Lookup(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            min_delay: Duration::from_secs(1),
            last_request: Cell::new(None),
        })
    }

    pub fn from_config(config: &CivicConfig) -> Result<Self> {
        Ok(
            Self::new(&config.geocoder_url, &config.user_agent, config.lookup_timeout())?
                .with_min_delay(config.geocode_min_delay()),
        )
    }

    pub fn with_min_delay(mut self, min_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self
    }

    fn throttle(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < self.min_delay {
                thread::sleep(self.min_delay - elapsed);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Coordinates>> {
        self.throttle();
        debug!(address, endpoint = %self.endpoint, "geocoding address");

        let places: Vec<NominatimPlace> = self
            .client
            .get(&self.endpoint)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json())
            .map_err(|e| CivicError::Lookup(e.to_string()))?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };
        let lat = place.lat.parse::<f64>();
        let lng = place.lon.parse::<f64>();
        match (lat, lng) {
            (Ok(lat), Ok(lng)) => Ok(Some(Coordinates::new(lat, lng))),
            _ => Err(CivicError::Lookup(format!(
                "geocoder returned unparseable coordinates ({}, {})",
                place.lat, place.lon
            ))),
        }
    }
}

/// Memoizing front for a [`Geocoder`].
///
/// Hits are remembered by trimmed address for as long as the cache lives.
/// Misses and failures are not remembered, so a transient outage is retried
/// on the next call.
pub struct GeocodeCache<G: Geocoder> {
    geocoder: G,
    entries: HashMap<String, Coordinates>,
}

impl<G: Geocoder> GeocodeCache<G> {
    pub fn new(geocoder: G) -> Self {
        Self {
            geocoder,
            entries: HashMap::new(),
        }
    }

    pub fn resolve(&mut self, address: &str) -> Option<Coordinates> {
        let key = address.trim();
        if key.is_empty() {
            return None;
        }
        if let Some(coords) = self.entries.get(key) {
            debug!(address = key, "geocode cache hit");
            return Some(*coords);
        }

        match self.geocoder.geocode(key) {
            Ok(Some(coords)) => {
                self.entries.insert(key.to_string(), coords);
                Some(coords)
            }
            Ok(None) => {
                debug!(address = key, "geocoder found no match");
                None
            }
            Err(e) => {
                warn!(address = key, error = %e, "geocoding failed");
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }
}
