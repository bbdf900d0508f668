//! Resolver selection from boot settings

use crate::S3RegionResolver;
use config::BootSettings;
use std::time::Duration;
use types::{DisabledRegionResolver, RegionError, RegionResolver};

/// Build the resolver the settings ask for
pub fn from_settings(settings: &BootSettings) -> Result<Box<dyn RegionResolver>, RegionError> {
    if !settings.region_lookup {
        tracing::info!("Region lookup disabled, the baseline region applies when none is configured");
        return Ok(Box::new(DisabledRegionResolver));
    }

    let resolver = S3RegionResolver::new(
        &settings.region_lookup_endpoint,
        Duration::from_secs(settings.region_lookup_timeout_seconds),
    )?;
    Ok(Box::new(resolver))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_lookup() {
        let settings = BootSettings {
            region_lookup: false,
            ..BootSettings::default()
        };
        let resolver = from_settings(&settings).unwrap();
        assert_eq!(resolver.name(), "disabled");
    }

    #[test]
    fn test_http_lookup() {
        let resolver = from_settings(&BootSettings::default()).unwrap();
        assert_eq!(resolver.name(), "s3");
    }
}
