use crate::error::EtaError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Vendor endpoint used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://apps3.talonsystems.com/tseta/servlet/Talonws";

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub eta: EtaConfig,
    pub server: ServerConfig,
    pub tui: TuiConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EtaConfig {
    pub base_url: String,
    pub customer_code: String,
    pub access_code: String,
    pub username: String,
    pub location: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TuiConfig {
    pub poll_interval_seconds: u64,
}

/// The three static values ETA authenticates every request with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub customer_code: String,
    pub access_code: String,
    pub username: String,
}

impl Credentials {
    /// Request parameters in the order ETA expects them.
    pub fn params(&self) -> [(&'static str, &str); 3] {
        [
            ("customercode", self.customer_code.as_str()),
            ("accesscode", self.access_code.as_str()),
            ("username", self.username.as_str()),
        ]
    }
}

impl Default for EtaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            customer_code: String::new(),
            access_code: String::new(),
            username: String::new(),
            location: String::new(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 60,
        }
    }
}

impl EtaConfig {
    /// The configured base URL, or the vendor default when blank.
    pub fn base_url(&self) -> &str {
        let url = self.base_url.trim();
        if url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            url
        }
    }

    /// Validates that every credential is present.
    ///
    /// Blank values count as missing, and all missing keys are reported
    /// together in a single [`EtaError::Configuration`]. Present values are
    /// passed on exactly as configured.
    pub fn credentials(&self) -> Result<Credentials, EtaError> {
        let creds = Credentials {
            customer_code: self.customer_code.clone(),
            access_code: self.access_code.clone(),
            username: self.username.clone(),
        };

        let missing: Vec<&'static str> = creds
            .params()
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(key, _)| *key)
            .collect();

        if missing.is_empty() {
            Ok(creds)
        } else {
            Err(EtaError::Configuration { missing })
        }
    }
}

impl Config {
    /// Loads config.toml from the working directory and applies
    /// environment overrides on top.
    pub fn load() -> Self {
        let mut config = Self::from_file(DEFAULT_CONFIG_PATH);
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Reads a config file, falling back to defaults if it is missing or
    /// cannot be parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    return config;
                }
                Err(e) => warn!("Failed to parse {}: {}. Using defaults.", path.display(), e),
            },
            Err(_) => info!("No {} found, using defaults.", path.display()),
        }
        Self::default()
    }

    /// Overrides fields from environment-style variables.
    ///
    /// `lookup` returns the value for a variable name, so tests can feed a
    /// map instead of touching the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let targets: [(&str, &mut String); 6] = [
            ("ETA_BASE_URL", &mut self.eta.base_url),
            ("ETA_CUSTOMER_CODE", &mut self.eta.customer_code),
            ("ETA_ACCESS_CODE", &mut self.eta.access_code),
            ("ETA_USERNAME", &mut self.eta.username),
            ("ETA_LOCATION", &mut self.eta.location),
            ("FLEET_BIND_ADDR", &mut self.server.bind_addr),
        ];

        for (key, field) in targets {
            if let Some(value) = lookup(key) {
                *field = value;
            }
        }
    }
}
