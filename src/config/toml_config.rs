use crate::config::{GeocoderSettings, DEFAULT_GEOCODE_ENDPOINT, DEFAULT_TIMEOUT_SECONDS};
use crate::utils::error::{EtlError, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Optional settings file passed with `--config`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub geocoder: Option<GeocoderSection>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocoderSection {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputSection {
    pub pretty: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn geocoder_settings(&self) -> GeocoderSettings {
        let section = self.geocoder.clone().unwrap_or_default();
        GeocoderSettings {
            endpoint: section
                .endpoint
                .unwrap_or_else(|| DEFAULT_GEOCODE_ENDPOINT.to_string()),
            timeout_seconds: section.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            region: section.region,
        }
    }

    pub fn pretty_output(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.pretty)
            .unwrap_or(false)
    }
}
