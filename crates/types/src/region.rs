//! Bucket region lookup interface

use crate::error::RegionError;
use async_trait::async_trait;

/// Maps a bucket name to its best-guess storage region
#[async_trait]
pub trait RegionResolver: Send + Sync {
    /// Guess the region of `bucket`
    async fn guess(&self, bucket: &str) -> Result<String, RegionError>;

    /// Get the name of the resolver
    fn name(&self) -> &str;
}

/// Resolver that always fails, leaving the baseline region in place
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRegionResolver;

#[async_trait]
impl RegionResolver for DisabledRegionResolver {
    async fn guess(&self, _bucket: &str) -> Result<String, RegionError> {
        Err(RegionError::Disabled)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// Resolver answering with a fixed region
#[derive(Debug, Clone)]
pub struct StaticRegionResolver {
    region: String,
}

impl StaticRegionResolver {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }
}

#[async_trait]
impl RegionResolver for StaticRegionResolver {
    async fn guess(&self, _bucket: &str) -> Result<String, RegionError> {
        Ok(self.region.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}
