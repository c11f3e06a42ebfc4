use crate::error::{CivicError, Result};
use crate::model::Coordinates;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";

/// Keys accepted by `get`/`set`, in display order.
pub const CONFIG_KEYS: [&str; 6] = [
    "default-center",
    "geocoder-url",
    "locator-url",
    "user-agent",
    "lookup-timeout",
    "geocode-min-delay",
];

/// Configuration for civicpin, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CivicConfig {
    /// Where reports land when nothing better is known
    #[serde(default = "default_center")]
    pub default_center: Coordinates,

    /// Nominatim-compatible search endpoint
    #[serde(default = "default_geocoder_url")]
    pub geocoder_url: String,

    /// IP geolocation endpoint (ip-api.com JSON format)
    #[serde(default = "default_locator_url")]
    pub locator_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout for external lookups, in seconds
    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,

    /// Minimum spacing between geocoding requests, in milliseconds
    #[serde(default = "default_geocode_min_delay_ms")]
    pub geocode_min_delay_ms: u64,
}

// Bengaluru
fn default_center() -> Coordinates {
    Coordinates::new(12.9716, 77.5946)
}

fn default_geocoder_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_locator_url() -> String {
    "http://ip-api.com/json".to_string()
}

fn default_user_agent() -> String {
    format!("civicpin/{}", env!("CARGO_PKG_VERSION"))
}

fn default_lookup_timeout_secs() -> u64 {
    10
}

fn default_geocode_min_delay_ms() -> u64 {
    1000
}

impl Default for CivicConfig {
    fn default() -> Self {
        Self {
            default_center: default_center(),
            geocoder_url: default_geocoder_url(),
            locator_url: default_locator_url(),
            user_agent: default_user_agent(),
            lookup_timeout_secs: default_lookup_timeout_secs(),
            geocode_min_delay_ms: default_geocode_min_delay_ms(),
        }
    }
}

impl CivicConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(CivicError::Io)?;
        let config: CivicConfig =
            serde_json::from_str(&content).map_err(CivicError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(CivicError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(CivicError::Serialization)?;
        fs::write(config_path, content).map_err(CivicError::Io)?;
        Ok(())
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    pub fn geocode_min_delay(&self) -> Duration {
        Duration::from_millis(self.geocode_min_delay_ms)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default-center" => Some(format!(
                "{},{}",
                self.default_center.lat, self.default_center.lng
            )),
            "geocoder-url" => Some(self.geocoder_url.clone()),
            "locator-url" => Some(self.locator_url.clone()),
            "user-agent" => Some(self.user_agent.clone()),
            "lookup-timeout" => Some(self.lookup_timeout_secs.to_string()),
            "geocode-min-delay" => Some(self.geocode_min_delay_ms.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let value = value.trim();
        match key {
            "default-center" => {
                self.default_center = value.parse().map_err(|e: CivicError| e.to_string())?;
            }
            "geocoder-url" => self.geocoder_url = parse_url(value)?,
            "locator-url" => self.locator_url = parse_url(value)?,
            "user-agent" => {
                if value.is_empty() {
                    return Err("user-agent cannot be empty".to_string());
                }
                self.user_agent = value.to_string();
            }
            "lookup-timeout" => {
                let secs: u64 = value
                    .parse()
                    .map_err(|_| format!("Invalid number of seconds: {}", value))?;
                if secs == 0 {
                    return Err("lookup-timeout must be at least 1 second".to_string());
                }
                self.lookup_timeout_secs = secs;
            }
            "geocode-min-delay" => {
                self.geocode_min_delay_ms = value
                    .parse()
                    .map_err(|_| format!("Invalid number of milliseconds: {}", value))?;
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}

fn parse_url(value: &str) -> std::result::Result<String, String> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value.to_string())
    } else {
        Err(format!("Expected an http(s) URL, got: {}", value))
    }
}
