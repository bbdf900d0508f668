//! Bucket descriptor written by the provisioning sidecar
//!
//! The sidecar mounts a JSON document of the form
//!
//! ```json
//! {"spec": {"bucketName": "...", "secretS3": {"endpoint": "...", "region": "...",
//!           "accessKeyID": "...", "accessSecretKey": "..."}}}
//! ```
//!
//! Absent members decode as empty strings; only malformed JSON is rejected.

use crate::{error::DescriptorError, secret::Secret};
use serde::{Deserialize, Serialize};

/// Storage identity named by the provisioning descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketDescriptor {
    /// Bucket the proxy fronts
    #[serde(rename = "bucketName", default)]
    pub bucket_name: String,
    /// Connection secret for the bucket
    #[serde(rename = "secretS3", default)]
    pub secret: SecretS3,
}

/// S3 connection secret
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretS3 {
    /// Storage endpoint URL
    #[serde(default)]
    pub endpoint: String,
    /// Bucket region, may be empty
    #[serde(default)]
    pub region: String,
    /// Access key id
    #[serde(rename = "accessKeyID", default)]
    pub access_key_id: Secret,
    /// Secret access key
    #[serde(rename = "accessSecretKey", default)]
    pub access_secret_key: Secret,
}

/// On-disk envelope around the descriptor
#[derive(Debug, Default, Deserialize)]
struct BucketInfo {
    #[serde(default)]
    spec: BucketDescriptor,
}

impl BucketDescriptor {
    /// Decode a descriptor from the sidecar's JSON document
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DescriptorError> {
        let info: BucketInfo =
            serde_json::from_slice(bytes).map_err(|source| DescriptorError::Parse { source })?;
        Ok(info.spec)
    }
}
