use crate::error::{CivicError, Result};
use crate::geocode::Geocoder;
use crate::locate::Locator;
use crate::model::Coordinates;
use std::cell::Cell;
use std::collections::HashMap;

/// Geocoder answering from a fixed table and counting its calls.
#[derive(Default)]
pub struct FakeGeocoder {
    known: HashMap<String, Coordinates>,
    calls: Cell<usize>,
}

impl FakeGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: &str, coords: Coordinates) -> Self {
        self.known.insert(address.to_string(), coords);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Geocoder for FakeGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Coordinates>> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.known.get(address).copied())
    }
}

/// Geocoder whose service is always down.
#[derive(Default)]
pub struct FailingGeocoder {
    calls: Cell<usize>,
}

impl FailingGeocoder {
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Geocoder for FailingGeocoder {
    fn geocode(&self, _address: &str) -> Result<Option<Coordinates>> {
        self.calls.set(self.calls.get() + 1);
        Err(CivicError::Lookup("connection refused".to_string()))
    }
}

/// Locator with a canned answer; `None` simulates an unreachable service.
pub struct FakeLocator(pub Option<Coordinates>);

impl Locator for FakeLocator {
    fn locate(&self) -> Result<Option<Coordinates>> {
        match self.0 {
            Some(coords) => Ok(Some(coords)),
            None => Err(CivicError::Lookup("no route to host".to_string())),
        }
    }
}
