//! HTTP bucket region probe

use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use tokio::time::timeout;
use types::{RegionError, RegionResolver};

/// Response header carrying the bucket region
pub const BUCKET_REGION_HEADER: &str = "x-amz-bucket-region";

/// Region resolver issuing `HEAD {endpoint}/{bucket}`.
///
/// S3 reports the bucket region in a response header whatever the status
/// (200, 301 and 403 all carry it), so redirects are not followed and the
/// status is not checked.
#[derive(Debug, Clone)]
pub struct S3RegionResolver {
    endpoint: String,
    timeout: Duration,
    http_client: Client,
}

impl S3RegionResolver {
    /// Create a new region resolver
    pub fn new(endpoint: &str, request_timeout: Duration) -> Result<Self, RegionError> {
        let http_client = Client::builder()
            .connect_timeout(request_timeout)
            .redirect(Policy::none())
            .user_agent(concat!("s3-proxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RegionError::Http {
                bucket: String::new(),
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout: request_timeout,
            http_client,
        })
    }

    /// Get the lookup endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RegionResolver for S3RegionResolver {
    async fn guess(&self, bucket: &str) -> Result<String, RegionError> {
        let url = format!("{}/{}", self.endpoint, bucket);

        tracing::debug!(bucket = %bucket, url = %url, "Looking up bucket region");

        let response = timeout(self.timeout, self.http_client.head(&url).send())
            .await
            .map_err(|_| RegionError::Timeout {
                bucket: bucket.to_string(),
            })?
            .map_err(|e| RegionError::Http {
                bucket: bucket.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let region = response
            .headers()
            .get(BUCKET_REGION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        match region {
            Some(region) => {
                tracing::info!(bucket = %bucket, region = %region, status, "Bucket region found");
                Ok(region.to_string())
            }
            None => Err(RegionError::MissingHeader {
                bucket: bucket.to_string(),
                status,
            }),
        }
    }

    fn name(&self) -> &str {
        "s3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn resolver(uri: &str) -> S3RegionResolver {
        S3RegionResolver::new(uri, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_region_from_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path("/my-bucket"))
            .respond_with(ResponseTemplate::new(200).insert_header(BUCKET_REGION_HEADER, "eu-west-1"))
            .mount(&mock_server)
            .await;

        let result = resolver(&mock_server.uri()).guess("my-bucket").await;
        assert_eq!(result.unwrap(), "eu-west-1");
    }

    #[tokio::test]
    async fn test_region_from_redirect_is_not_followed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path("/moved-bucket"))
            .respond_with(
                ResponseTemplate::new(301)
                    .insert_header(BUCKET_REGION_HEADER, "ap-southeast-2")
                    .insert_header("location", "https://moved-bucket.s3.ap-southeast-2.amazonaws.com/"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = resolver(&mock_server.uri()).guess("moved-bucket").await;
        assert_eq!(result.unwrap(), "ap-southeast-2");
    }

    #[tokio::test]
    async fn test_forbidden_bucket_still_reports_region() {
        let mock_server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path("/private-bucket"))
            .respond_with(ResponseTemplate::new(403).insert_header(BUCKET_REGION_HEADER, "us-west-2"))
            .mount(&mock_server)
            .await;

        let result = resolver(&mock_server.uri()).guess("private-bucket").await;
        assert_eq!(result.unwrap(), "us-west-2");
    }

    #[tokio::test]
    async fn test_missing_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path("/unknown-bucket"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let result = resolver(&mock_server.uri()).guess("unknown-bucket").await;
        assert!(matches!(
            result,
            Err(RegionError::MissingHeader { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_lookup_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path("/slow-bucket"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(BUCKET_REGION_HEADER, "eu-west-1")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let resolver = S3RegionResolver::new(&mock_server.uri(), Duration::from_millis(200)).unwrap();
        let result = resolver.guess("slow-bucket").await;
        assert!(matches!(result, Err(RegionError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let resolver = S3RegionResolver::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let result = resolver.guess("my-bucket").await;
        assert!(matches!(result, Err(RegionError::Http { .. })));
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let resolver = resolver("https://s3.amazonaws.com/");
        assert_eq!(resolver.endpoint(), "https://s3.amazonaws.com");
    }
}
