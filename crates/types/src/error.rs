//! Error types for the S3 proxy

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the S3 proxy
#[derive(Error, Debug)]
pub enum S3ProxyError {
    /// Descriptor could not be read or decoded
    #[error("Descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    /// Resolved configuration is unusable
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Bucket region lookup errors
    #[error("Region lookup error: {0}")]
    Region(#[from] RegionError),

    /// Boot sequence misuse
    #[error("Boot error: {0}")]
    Boot(String),
}

/// Result type alias for S3 proxy operations
pub type Result<T> = std::result::Result<T, S3ProxyError>;

/// Provisioning descriptor errors. Both variants are fatal at boot.
#[derive(Error, Debug)]
pub enum DescriptorError {
    /// Descriptor file unreadable
    #[error("Failed to read descriptor file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Descriptor body is not valid JSON
    #[error("Failed to parse descriptor: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Missing required field
    #[error("Missing required configuration field: {field}")]
    MissingField { field: String },

    /// Validation error
    #[error("Configuration validation error: {field}: {message}")]
    ValidationError { field: String, message: String },

    /// Invalid value
    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Process settings could not be extracted
    #[error("Invalid proxy settings: {0}")]
    Settings(String),
}

/// Region lookup specific errors
#[derive(Error, Debug)]
pub enum RegionError {
    /// Lookup did not complete in time
    #[error("Region lookup timed out for bucket {bucket}")]
    Timeout { bucket: String },

    /// Transport level failure
    #[error("Region lookup request failed for bucket {bucket}: {message}")]
    Http { bucket: String, message: String },

    /// Endpoint answered without a region header
    #[error("No region header returned for bucket {bucket} (status {status})")]
    MissingHeader { bucket: String, status: u16 },

    /// Lookup switched off in settings
    #[error("Region lookup is disabled")]
    Disabled,
}

impl ConfigError {
    /// Name of the configuration field the error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::MissingField { field }
            | ConfigError::ValidationError { field, .. }
            | ConfigError::InvalidValue { field, .. } => Some(field),
            ConfigError::Settings(_) => None,
        }
    }
}
