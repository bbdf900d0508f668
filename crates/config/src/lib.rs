//! Configuration management for the S3 proxy
//!
//! This crate turns the provisioning descriptor and the process environment
//! into a validated, immutable [`Configuration`], and publishes the canonical
//! storage values for the storage client.

pub mod env;
pub mod lifecycle;
pub mod loader;
pub mod publisher;
pub mod resolver;
pub mod schema;
pub mod settings;
pub mod validation;

pub use env::EnvSnapshot;
pub use lifecycle::{BootSequence, BootState, ReadyConfig};
pub use loader::DescriptorLoader;
pub use publisher::{EnvSink, EnvironmentPublisher, ProcessEnv, StorageEnvironment};
pub use resolver::ConfigResolver;
pub use schema::*;
pub use settings::BootSettings;
pub use validation::*;
