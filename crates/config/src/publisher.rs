//! Publication of the canonical storage values
//!
//! The storage client receives a [`StorageEnvironment`] directly. The same
//! values can also be written into an [`EnvSink`] for SDKs that only look at
//! their default credential and region chain.

use crate::env::EnvSnapshot;
use crate::schema::Configuration;
use tracing::debug;
use types::Secret;

pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_S3_BUCKET: &str = "AWS_S3_BUCKET";
pub const AWS_REGION: &str = "AWS_REGION";

/// Destination for published variables
pub trait EnvSink {
    fn set(&mut self, key: &str, value: &str);
}

/// The real process environment.
///
/// Only write to it from the boot routine, before any other task reads the
/// environment.
#[derive(Debug, Default)]
pub struct ProcessEnv;

impl EnvSink for ProcessEnv {
    fn set(&mut self, key: &str, value: &str) {
        std::env::set_var(key, value);
    }
}

impl EnvSink for EnvSnapshot {
    fn set(&mut self, key: &str, value: &str) {
        self.insert(key, value);
    }
}

/// Canonical values handed to the storage client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEnvironment {
    pub access_key_id: Secret,
    pub secret_access_key: Secret,
    pub bucket: String,
    pub region: String,
}

impl StorageEnvironment {
    pub fn from_config(config: &Configuration) -> Self {
        Self {
            access_key_id: config.s3_access_key_id.clone(),
            secret_access_key: config.s3_access_secret_key.clone(),
            bucket: config.s3_bucket.clone(),
            region: config.aws_region.clone(),
        }
    }

    /// Variable name and value pairs, in publication order
    pub fn vars(&self) -> [(&'static str, &str); 4] {
        [
            (AWS_ACCESS_KEY_ID, self.access_key_id.expose()),
            (AWS_SECRET_ACCESS_KEY, self.secret_access_key.expose()),
            (AWS_S3_BUCKET, &self.bucket),
            (AWS_REGION, &self.region),
        ]
    }
}

/// Writes the canonical storage values into a sink
pub struct EnvironmentPublisher;

impl EnvironmentPublisher {
    /// Publish the storage values of `config` into `sink`.
    ///
    /// Idempotent. Must complete before the storage client is built.
    pub fn publish(config: &Configuration, sink: &mut dyn EnvSink) -> StorageEnvironment {
        let storage = StorageEnvironment::from_config(config);
        for (key, value) in storage.vars() {
            sink.set(key, value);
        }

        debug!(bucket = %storage.bucket, region = %storage.region, "Storage environment published");
        storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Configuration {
        Configuration {
            s3_bucket: "my-bucket".to_string(),
            aws_region: "eu-west-1".to_string(),
            s3_access_key_id: Secret::new("AK"),
            s3_access_secret_key: Secret::new("SK"),
            ..Configuration::default()
        }
    }

    #[test]
    fn test_publish_round_trip() {
        let mut sink = EnvSnapshot::new();
        let storage = EnvironmentPublisher::publish(&config(), &mut sink);

        assert_eq!(sink.get(AWS_ACCESS_KEY_ID), Some("AK"));
        assert_eq!(sink.get(AWS_SECRET_ACCESS_KEY), Some("SK"));
        assert_eq!(sink.get(AWS_S3_BUCKET), Some("my-bucket"));
        assert_eq!(sink.get(AWS_REGION), Some("eu-west-1"));
        assert_eq!(storage, StorageEnvironment::from_config(&config()));
    }

    #[test]
    fn test_publish_is_idempotent() {
        let mut sink = EnvSnapshot::new();
        EnvironmentPublisher::publish(&config(), &mut sink);
        let once = sink.clone();

        EnvironmentPublisher::publish(&config(), &mut sink);
        assert_eq!(sink, once);
        assert_eq!(sink.len(), 4);
    }

    #[test]
    fn test_publish_overwrites_previous_values() {
        let mut sink = EnvSnapshot::from_pairs([(AWS_REGION, "us-west-2")]);
        EnvironmentPublisher::publish(&config(), &mut sink);
        assert_eq!(sink.get(AWS_REGION), Some("eu-west-1"));
    }

    #[test]
    fn test_publish_to_process_environment() {
        let config = Configuration {
            s3_bucket: "process-env-bucket".to_string(),
            ..config()
        };
        EnvironmentPublisher::publish(&config, &mut ProcessEnv);
        assert_eq!(std::env::var(AWS_S3_BUCKET).unwrap(), "process-env-bucket");
        assert_eq!(std::env::var(AWS_REGION).unwrap(), "eu-west-1");
    }

    #[test]
    fn test_storage_environment_debug_is_redacted() {
        let storage = StorageEnvironment::from_config(&config());
        let debug = format!("{:?}", storage);
        assert!(debug.contains("my-bucket"));
        assert!(!debug.contains("\"SK\""));
    }
}
