//! Descriptor + environment merge

use crate::env::EnvSnapshot;
use crate::schema::{Configuration, CORS_MAX_AGE, IDLE_CONNECTION_TIMEOUT, MAX_IDLE_CONNECTIONS};
use types::{BucketDescriptor, Secret};

/// Merges the descriptor, the environment snapshot and the fixed defaults
pub struct ConfigResolver;

impl ConfigResolver {
    /// Build the canonical configuration.
    ///
    /// Storage identity comes from the descriptor only; `AWS_REGION` and
    /// `AWS_S3_BUCKET` in the environment never override it. HTTP behaviour
    /// comes from the environment, empty when unset. Never fails: empty
    /// mandatory values are left for the validator to classify.
    pub fn resolve(descriptor: &BucketDescriptor, env: &EnvSnapshot) -> Configuration {
        let secret = &descriptor.secret;

        Configuration {
            aws_region: secret.region.clone(),
            aws_api_endpoint: env.get_or_empty("AWS_API_ENDPOINT"),
            s3_bucket: descriptor.bucket_name.clone(),
            s3_key_prefix: env.get_or_empty("AWS_S3_KEY_PREFIX"),
            index_document: env.get_or_empty("INDEX_DOCUMENT"),
            directory_listing: false,
            dir_listing_format: env.get_or_empty("DIRECTORY_LISTINGS_FORMAT"),
            http_cache_control: env.get_or_empty("HTTP_CACHE_CONTROL"),
            http_expires: env.get_or_empty("HTTP_EXPIRES"),
            basic_auth_user: env.get_or_empty("BASIC_AUTH_USER"),
            basic_auth_pass: Secret::new(env.get_or_empty("BASIC_AUTH_PASS")),
            port: env.get_or_empty("APP_PORT"),
            host: env.get_or_empty("APP_HOST"),
            access_log: false,
            ssl_cert: env.get_or_empty("SSL_CERT_PATH"),
            ssl_key: env.get_or_empty("SSL_KEY_PATH"),
            strip_path: env.get_or_empty("STRIP_PATH"),
            content_encoding: true,
            cors_allow_origin: env.get_or_empty("CORS_ALLOW_ORIGIN"),
            cors_allow_methods: env.get_or_empty("CORS_ALLOW_METHODS"),
            cors_allow_headers: env.get_or_empty("CORS_ALLOW_HEADERS"),
            cors_max_age: CORS_MAX_AGE,
            health_check_path: env.get_or_empty("HEALTHCHECK_PATH"),
            all_pages_in_dir: false,
            max_idle_conns: MAX_IDLE_CONNECTIONS,
            idle_conn_timeout: IDLE_CONNECTION_TIMEOUT,
            disable_compression: true,
            insecure_tls: false,
            jwt_secret_key: Secret::new(env.get_or_empty("JWT_SECRET_KEY")),
            s3_endpoint: secret.endpoint.clone(),
            s3_access_key_id: secret.access_key_id.clone(),
            s3_access_secret_key: secret.access_secret_key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::SecretS3;

    fn descriptor() -> BucketDescriptor {
        BucketDescriptor {
            bucket_name: "my-bucket".to_string(),
            secret: SecretS3 {
                endpoint: "https://s3.example.com".to_string(),
                region: String::new(),
                access_key_id: Secret::new("AK"),
                access_secret_key: Secret::new("SK"),
            },
        }
    }

    #[test]
    fn test_storage_identity_from_descriptor() {
        let config = ConfigResolver::resolve(&descriptor(), &EnvSnapshot::new());

        assert_eq!(config.s3_endpoint, "https://s3.example.com");
        assert_eq!(config.s3_bucket, "my-bucket");
        assert_eq!(config.aws_region, "");
        assert_eq!(config.s3_access_key_id.expose(), "AK");
        assert_eq!(config.s3_access_secret_key.expose(), "SK");
    }

    #[test]
    fn test_environment_does_not_override_storage_identity() {
        let env = EnvSnapshot::from_pairs([
            ("AWS_REGION", "ap-northeast-1"),
            ("AWS_S3_BUCKET", "other-bucket"),
        ]);
        let config = ConfigResolver::resolve(&descriptor(), &env);

        assert_eq!(config.s3_bucket, "my-bucket");
        assert_eq!(config.aws_region, "");
    }

    #[test]
    fn test_http_fields_from_environment() {
        let env = EnvSnapshot::from_pairs([
            ("AWS_API_ENDPOINT", "https://api.example.com"),
            ("AWS_S3_KEY_PREFIX", "site/"),
            ("INDEX_DOCUMENT", "index.html"),
            ("HTTP_CACHE_CONTROL", "max-age=86400"),
            ("HTTP_EXPIRES", "Thu, 01 Dec 1994 16:00:00 GMT"),
            ("BASIC_AUTH_USER", "admin"),
            ("BASIC_AUTH_PASS", "hunter2"),
            ("APP_PORT", "8080"),
            ("APP_HOST", "127.0.0.1"),
            ("SSL_CERT_PATH", "/tls/cert.pem"),
            ("SSL_KEY_PATH", "/tls/key.pem"),
            ("STRIP_PATH", "/static"),
            ("CORS_ALLOW_ORIGIN", "*"),
            ("CORS_ALLOW_METHODS", "GET,HEAD"),
            ("CORS_ALLOW_HEADERS", "Authorization"),
            ("HEALTHCHECK_PATH", "/healthz"),
            ("JWT_SECRET_KEY", "jwt-key"),
        ]);
        let config = ConfigResolver::resolve(&descriptor(), &env);

        assert_eq!(config.aws_api_endpoint, "https://api.example.com");
        assert_eq!(config.s3_key_prefix, "site/");
        assert_eq!(config.index_document, "index.html");
        assert_eq!(config.http_cache_control, "max-age=86400");
        assert_eq!(config.http_expires, "Thu, 01 Dec 1994 16:00:00 GMT");
        assert_eq!(config.basic_auth_user, "admin");
        assert_eq!(config.basic_auth_pass.expose(), "hunter2");
        assert_eq!(config.port, "8080");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.ssl_cert, "/tls/cert.pem");
        assert_eq!(config.ssl_key, "/tls/key.pem");
        assert_eq!(config.strip_path, "/static");
        assert_eq!(config.cors_allow_origin, "*");
        assert_eq!(config.cors_allow_methods, "GET,HEAD");
        assert_eq!(config.cors_allow_headers, "Authorization");
        assert_eq!(config.health_check_path, "/healthz");
        assert_eq!(config.jwt_secret_key.expose(), "jwt-key");
    }

    #[test]
    fn test_absent_http_fields_are_empty() {
        let config = ConfigResolver::resolve(&descriptor(), &EnvSnapshot::new());

        assert!(config.index_document.is_empty());
        assert!(config.port.is_empty());
        assert!(config.host.is_empty());
        assert!(config.ssl_cert.is_empty());
        assert!(config.basic_auth_pass.is_empty());
        assert!(config.health_check_route().is_none());
    }

    #[test]
    fn test_fixed_defaults_ignore_environment() {
        let env = EnvSnapshot::from_pairs([
            ("CORS_MAX_AGE", "30"),
            ("MAX_IDLE_CONNECTIONS", "5"),
            ("DIRECTORY_LISTINGS", "true"),
            ("DISABLE_COMPRESSION", "false"),
        ]);
        let config = ConfigResolver::resolve(&descriptor(), &env);

        assert_eq!(config.cors_max_age, 600);
        assert_eq!(config.max_idle_conns, 150);
        assert!(!config.directory_listing);
        assert!(config.disable_compression);

        let config = ConfigResolver::resolve(&descriptor(), &EnvSnapshot::new());
        assert_eq!(config.cors_max_age, 600);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let env = EnvSnapshot::from_pairs([("APP_PORT", "9000"), ("STRIP_PATH", "/x")]);
        let first = ConfigResolver::resolve(&descriptor(), &env);
        let second = ConfigResolver::resolve(&descriptor(), &env);
        assert_eq!(first, second);
    }
}
