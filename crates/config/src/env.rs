//! Isolated snapshot of the process environment

use std::collections::BTreeMap;
use std::env::VarError;
use tracing::warn;

/// Environment variables read by the resolver
pub const CONSUMED_VARS: &[&str] = &[
    "AWS_REGION",
    "AWS_API_ENDPOINT",
    "AWS_S3_BUCKET",
    "AWS_S3_KEY_PREFIX",
    "INDEX_DOCUMENT",
    "DIRECTORY_LISTINGS_FORMAT",
    "HTTP_CACHE_CONTROL",
    "HTTP_EXPIRES",
    "BASIC_AUTH_USER",
    "BASIC_AUTH_PASS",
    "APP_PORT",
    "APP_HOST",
    "SSL_CERT_PATH",
    "SSL_KEY_PATH",
    "STRIP_PATH",
    "CORS_ALLOW_ORIGIN",
    "CORS_ALLOW_METHODS",
    "CORS_ALLOW_HEADERS",
    "HEALTHCHECK_PATH",
    "JWT_SECRET_KEY",
];

/// Owned copy of environment variables.
///
/// Taken once before resolution. Later writes to the process environment
/// are not visible through an existing snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the consumed variables from the process environment
    pub fn from_process() -> Self {
        let vars = CONSUMED_VARS
            .iter()
            .filter_map(|key| {
                read_var(key, std::env::var(key)).map(|value| (key.to_string(), value))
            })
            .collect();
        Self { vars }
    }

    /// Build a snapshot from explicit pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Value of `key`, empty when unset
    pub fn get_or_empty(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Unset and non-UTF-8 values both count as unset; the latter is logged
fn read_var(key: &str, value: Result<String, VarError>) -> Option<String> {
    match value {
        Ok(value) => Some(value),
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(_)) => {
            warn!(variable = key, "Environment variable is not valid UTF-8, treating it as unset");
            None
        }
    }
}
