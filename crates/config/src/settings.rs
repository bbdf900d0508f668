//! Settings of the proxy process itself
//!
//! These control how the proxy boots (where the descriptor lives, how it
//! logs, whether it may call out for the bucket region). They are distinct
//! from the resolved storage [`Configuration`](crate::Configuration).

use crate::loader::DEFAULT_DESCRIPTOR_PATH;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use types::ConfigError;

/// Prefix of environment variables overriding boot settings
pub const SETTINGS_ENV_PREFIX: &str = "S3_PROXY_";

/// Boot settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootSettings {
    /// Path of the bucket descriptor
    #[serde(default = "default_descriptor_path")]
    pub descriptor_path: String,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// Whether the bucket region may be looked up over the network
    #[serde(default = "default_true")]
    pub region_lookup: bool,
    /// Base URL of the region lookup endpoint
    #[serde(default = "default_region_lookup_endpoint")]
    pub region_lookup_endpoint: String,
    /// Region lookup timeout in seconds
    #[serde(default = "default_region_lookup_timeout")]
    pub region_lookup_timeout_seconds: u64,
    /// Whether to write the storage values into the process environment
    #[serde(default = "default_true")]
    pub publish_environment: bool,
}

fn default_descriptor_path() -> String {
    DEFAULT_DESCRIPTOR_PATH.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_true() -> bool {
    true
}

fn default_region_lookup_endpoint() -> String {
    "https://s3.amazonaws.com".to_string()
}

fn default_region_lookup_timeout() -> u64 {
    5
}

impl Default for BootSettings {
    fn default() -> Self {
        Self {
            descriptor_path: default_descriptor_path(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            region_lookup: default_true(),
            region_lookup_endpoint: default_region_lookup_endpoint(),
            region_lookup_timeout_seconds: default_region_lookup_timeout(),
            publish_environment: default_true(),
        }
    }
}

impl BootSettings {
    /// Load settings: defaults, then the optional YAML file, then
    /// `S3_PROXY_`-prefixed environment variables
    pub fn load(settings_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(BootSettings::default()));
        if let Some(path) = settings_file {
            if !path.exists() {
                return Err(ConfigError::Settings(format!(
                    "settings file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(SETTINGS_ENV_PREFIX));

        Self::from_figment(figment)
    }

    /// Extract and validate settings from an assembled figment
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let settings: BootSettings = figment
            .extract()
            .map_err(|e| ConfigError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.descriptor_path.is_empty() {
            return Err(ConfigError::MissingField {
                field: "descriptor_path".to_string(),
            });
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(ConfigError::ValidationError {
                field: "log_level".to_string(),
                message: format!("Invalid log level: {}. Valid levels: {:?}", self.log_level, valid_log_levels),
            });
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&self.log_format.as_str()) {
            return Err(ConfigError::ValidationError {
                field: "log_format".to_string(),
                message: format!("Invalid log format: {}. Valid formats: {:?}", self.log_format, valid_log_formats),
            });
        }

        if self.region_lookup {
            if !self.region_lookup_endpoint.starts_with("http://")
                && !self.region_lookup_endpoint.starts_with("https://")
            {
                return Err(ConfigError::ValidationError {
                    field: "region_lookup_endpoint".to_string(),
                    message: format!("Invalid region lookup endpoint: {}", self.region_lookup_endpoint),
                });
            }

            if self.region_lookup_timeout_seconds == 0 {
                return Err(ConfigError::ValidationError {
                    field: "region_lookup_timeout_seconds".to_string(),
                    message: "Region lookup timeout cannot be 0".to_string(),
                });
            }
        }

        Ok(())
    }
}
