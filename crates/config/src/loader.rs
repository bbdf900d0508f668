//! Descriptor loader implementation

use std::path::Path;
use tracing::debug;
use types::{BucketDescriptor, DescriptorError};

/// Where the provisioning sidecar mounts the bucket descriptor
pub const DEFAULT_DESCRIPTOR_PATH: &str = "/data/cosi/BucketInfo";

/// Reads and decodes the bucket descriptor.
///
/// Both failures are fatal at boot; there is no retry or degraded mode.
pub struct DescriptorLoader;

impl DescriptorLoader {
    /// Read the raw descriptor bytes
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, DescriptorError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| DescriptorError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), size = bytes.len(), "Descriptor read");
        Ok(bytes)
    }

    /// Decode descriptor bytes
    pub fn parse(bytes: &[u8]) -> Result<BucketDescriptor, DescriptorError> {
        BucketDescriptor::from_slice(bytes)
    }

    /// Read and decode in one step
    pub fn load_descriptor<P: AsRef<Path>>(path: P) -> Result<BucketDescriptor, DescriptorError> {
        let bytes = Self::load(path)?;
        Self::parse(&bytes)
    }
}
