//! Configuration schema definitions

use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;
use types::{ConfigError, Secret};

/// Region assumed when neither the descriptor nor the lookup provides one
pub const DEFAULT_REGION: &str = "us-east-1";
/// Host bound when `APP_HOST` is empty
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Port bound when `APP_PORT` is empty
pub const DEFAULT_PORT: u16 = 80;

// Fixed defaults, not overridable from any source.
pub const CORS_MAX_AGE: i64 = 600;
pub const MAX_IDLE_CONNECTIONS: usize = 150;
pub const IDLE_CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Canonical resolved settings of the proxy.
///
/// Built once at boot and shared read-only behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// Bucket region (AWS_REGION is published from this)
    pub aws_region: String,
    /// AWS API endpoint override (AWS_API_ENDPOINT)
    pub aws_api_endpoint: String,
    /// Bucket name
    pub s3_bucket: String,
    /// Key prefix prepended to object paths (AWS_S3_KEY_PREFIX)
    pub s3_key_prefix: String,
    /// Index document served for directories (INDEX_DOCUMENT)
    pub index_document: String,
    /// Directory listings enabled
    pub directory_listing: bool,
    /// Directory listing format (DIRECTORY_LISTINGS_FORMAT)
    pub dir_listing_format: String,
    /// Cache-Control header value (HTTP_CACHE_CONTROL)
    pub http_cache_control: String,
    /// Expires header value (HTTP_EXPIRES)
    pub http_expires: String,
    /// Basic auth user (BASIC_AUTH_USER)
    pub basic_auth_user: String,
    /// Basic auth password (BASIC_AUTH_PASS)
    pub basic_auth_pass: Secret,
    /// Listen port (APP_PORT)
    pub port: String,
    /// Listen host (APP_HOST)
    pub host: String,
    /// Access log enabled
    pub access_log: bool,
    /// TLS certificate path (SSL_CERT_PATH)
    pub ssl_cert: String,
    /// TLS key path (SSL_KEY_PATH)
    pub ssl_key: String,
    /// Path prefix stripped from requests (STRIP_PATH)
    pub strip_path: String,
    /// Honour Content-Encoding of stored objects
    pub content_encoding: bool,
    /// CORS allowed origin (CORS_ALLOW_ORIGIN)
    pub cors_allow_origin: String,
    /// CORS allowed methods (CORS_ALLOW_METHODS)
    pub cors_allow_methods: String,
    /// CORS allowed headers (CORS_ALLOW_HEADERS)
    pub cors_allow_headers: String,
    /// CORS preflight max age in seconds
    pub cors_max_age: i64,
    /// Health check path (HEALTHCHECK_PATH)
    pub health_check_path: String,
    /// Fetch every page when listing a directory
    pub all_pages_in_dir: bool,
    /// Storage client idle connection pool size
    pub max_idle_conns: usize,
    /// Storage client idle connection timeout
    pub idle_conn_timeout: Duration,
    /// Disable transport compression on the storage client
    pub disable_compression: bool,
    /// Skip TLS verification towards the storage endpoint
    pub insecure_tls: bool,
    /// JWT verification key (JWT_SECRET_KEY)
    pub jwt_secret_key: Secret,
    /// Storage endpoint URL
    pub s3_endpoint: String,
    /// Storage access key id
    pub s3_access_key_id: Secret,
    /// Storage secret access key
    pub s3_access_secret_key: Secret,
}

/// How the HTTP front must listen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenMode {
    /// Plain HTTP
    Plain,
    /// HTTPS with the given PEM files
    Tls { cert_path: String, key_path: String },
}

impl Configuration {
    /// TLS only when both the certificate and the key path are set
    pub fn listen_mode(&self) -> ListenMode {
        if !self.ssl_cert.is_empty() && !self.ssl_key.is_empty() {
            ListenMode::Tls {
                cert_path: self.ssl_cert.clone(),
                key_path: self.ssl_key.clone(),
            }
        } else {
            ListenMode::Plain
        }
    }

    /// Socket address from `host`/`port`, falling back to the defaults.
    /// Host names are resolved; the first address wins.
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        let host = if self.host.is_empty() {
            DEFAULT_HOST
        } else {
            self.host.as_str()
        };

        let port = if self.port.is_empty() {
            DEFAULT_PORT
        } else {
            self.port.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                field: "port".to_string(),
                value: self.port.clone(),
            })?
        };

        (host, port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "host".to_string(),
                value: self.host.clone(),
            })
    }

    /// Health check route, if one is configured
    pub fn health_check_route(&self) -> Option<&str> {
        if self.health_check_path.is_empty() {
            None
        } else {
            Some(&self.health_check_path)
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            aws_region: String::new(),
            aws_api_endpoint: String::new(),
            s3_bucket: String::new(),
            s3_key_prefix: String::new(),
            index_document: String::new(),
            directory_listing: false,
            dir_listing_format: String::new(),
            http_cache_control: String::new(),
            http_expires: String::new(),
            basic_auth_user: String::new(),
            basic_auth_pass: Secret::default(),
            port: String::new(),
            host: String::new(),
            access_log: false,
            ssl_cert: String::new(),
            ssl_key: String::new(),
            strip_path: String::new(),
            content_encoding: true,
            cors_allow_origin: String::new(),
            cors_allow_methods: String::new(),
            cors_allow_headers: String::new(),
            cors_max_age: CORS_MAX_AGE,
            health_check_path: String::new(),
            all_pages_in_dir: false,
            max_idle_conns: MAX_IDLE_CONNECTIONS,
            idle_conn_timeout: IDLE_CONNECTION_TIMEOUT,
            disable_compression: true,
            insecure_tls: false,
            jwt_secret_key: Secret::default(),
            s3_endpoint: String::new(),
            s3_access_key_id: Secret::default(),
            s3_access_secret_key: Secret::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fixed_values() {
        let config = Configuration::default();
        assert_eq!(config.cors_max_age, 600);
        assert_eq!(config.max_idle_conns, 150);
        assert_eq!(config.idle_conn_timeout, Duration::from_secs(10));
        assert!(config.content_encoding);
        assert!(config.disable_compression);
        assert!(!config.directory_listing);
        assert!(!config.insecure_tls);
    }

    #[test]
    fn test_listen_mode() {
        let mut config = Configuration::default();
        assert_eq!(config.listen_mode(), ListenMode::Plain);

        config.ssl_cert = "/tls/cert.pem".to_string();
        assert_eq!(config.listen_mode(), ListenMode::Plain);

        config.ssl_key = "/tls/key.pem".to_string();
        assert_eq!(
            config.listen_mode(),
            ListenMode::Tls {
                cert_path: "/tls/cert.pem".to_string(),
                key_path: "/tls/key.pem".to_string(),
            }
        );

        config.ssl_cert.clear();
        assert_eq!(config.listen_mode(), ListenMode::Plain);
    }

    #[test]
    fn test_bind_address_defaults() {
        let config = Configuration::default();
        assert_eq!(config.bind_address().unwrap(), "0.0.0.0:80".parse().unwrap());
    }

    #[test]
    fn test_bind_address_from_fields() {
        let config = Configuration {
            host: "127.0.0.1".to_string(),
            port: "8080".to_string(),
            ..Configuration::default()
        };
        assert_eq!(config.bind_address().unwrap(), "127.0.0.1:8080".parse().unwrap());

        let config = Configuration {
            host: "::1".to_string(),
            port: "9000".to_string(),
            ..Configuration::default()
        };
        assert_eq!(config.bind_address().unwrap(), "[::1]:9000".parse().unwrap());
    }

    #[test]
    fn test_bind_address_rejects_bad_port() {
        let config = Configuration {
            port: "http".to_string(),
            ..Configuration::default()
        };
        let err = config.bind_address().unwrap_err();
        assert_eq!(err.field(), Some("port"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Configuration {
            s3_access_secret_key: Secret::new("very-secret-key"),
            basic_auth_pass: Secret::new("hunter2"),
            ..Configuration::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("very-secret-key"));
        assert!(!debug.contains("hunter2"));
    }
}
