//! Shared types for the S3 proxy
//!
//! This crate contains the domain types shared by the configuration,
//! region lookup and proxy crates: the provisioning descriptor, secret
//! wrappers, the region resolver seam and the error taxonomy.

pub mod descriptor;
pub mod error;
pub mod region;
pub mod secret;

// Re-export commonly used types
pub use descriptor::{BucketDescriptor, SecretS3};
pub use error::{ConfigError, DescriptorError, RegionError, Result, S3ProxyError};
pub use region::{DisabledRegionResolver, RegionResolver, StaticRegionResolver};
pub use secret::Secret;
