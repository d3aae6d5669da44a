pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_api_key, validate_path, validate_positive_number, validate_url, Validate,
};
use std::fmt;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

pub const DEFAULT_GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocoderSettings {
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub region: Option<String>,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEOCODE_ENDPOINT.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            region: None,
        }
    }
}

/// Usage: `convert <input_csv_path> <output_json_path> <geocoding_api_key>`
#[cfg(feature = "cli")]
#[derive(Clone, Parser)]
#[command(name = "convert")]
#[command(about = "Convert a COVID facilities CSV into geocoded JSON for the site finder")]
pub struct CliConfig {
    /// Facilities CSV with a header row
    pub input_path: String,

    /// Where to write the JSON array of visible facilities
    pub output_path: String,

    /// Google Maps geocoding API key
    pub api_key: String,

    /// Optional TOML settings file
    #[arg(long)]
    pub config: Option<String>,

    /// Override the geocoding endpoint
    #[arg(long)]
    pub geocode_endpoint: Option<String>,

    /// Per-request timeout for geocoding calls
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Region bias passed to the geocoder (ccTLD, e.g. "us")
    #[arg(long)]
    pub region: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Merges flags over the optional TOML file over built-in defaults.
    pub fn into_run_config(self) -> Result<RunConfig> {
        let file = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        let mut geocoder = file.geocoder_settings();
        if let Some(endpoint) = self.geocode_endpoint {
            geocoder.endpoint = endpoint;
        }
        if let Some(timeout) = self.timeout_seconds {
            geocoder.timeout_seconds = timeout;
        }
        if self.region.is_some() {
            geocoder.region = self.region;
        }

        Ok(RunConfig {
            input_path: self.input_path,
            output_path: self.output_path,
            api_key: self.api_key,
            geocoder,
            pretty: self.pretty || file.pretty_output(),
        })
    }
}

#[derive(Clone)]
pub struct RunConfig {
    pub input_path: String,
    pub output_path: String,
    pub api_key: String,
    pub geocoder: GeocoderSettings,
    pub pretty: bool,
}

impl RunConfig {
    pub fn new(input_path: impl Into<String>, output_path: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            api_key: api_key.into(),
            geocoder: GeocoderSettings::default(),
            pretty: false,
        }
    }
}

// Keeps the API key out of debug logs.
impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("input_path", &self.input_path)
            .field("output_path", &self.output_path)
            .field("api_key", &"<redacted>")
            .field("geocoder", &self.geocoder)
            .field("pretty", &self.pretty)
            .finish()
    }
}

impl ConfigProvider for RunConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn pretty_output(&self) -> bool {
        self.pretty
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input_path", &self.input_path)?;
        validate_path("output_path", &self.output_path)?;
        validate_api_key("api_key", &self.api_key)?;
        validate_url("geocoder.endpoint", &self.geocoder.endpoint)?;
        validate_positive_number("geocoder.timeout_seconds", self.geocoder.timeout_seconds, 1)?;
        Ok(())
    }
}
