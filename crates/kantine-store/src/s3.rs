//! Connection settings for S3-compatible object storage.

use std::sync::Arc;

use object_store::ObjectStore;
use object_store::aws::AmazonS3Builder;
use tracing::debug;

use crate::StoreError;

/// Credentials and endpoint shared by the cache and the publisher.
///
/// Every field is optional so that a partially configured environment can
/// still run; whichever component needs a missing value reports it as
/// [`StoreError::Configuration`] when it is used.
#[derive(Debug, Clone, Default)]
pub struct S3Config {
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub region: Option<String>,
}

impl S3Config {
    /// Names of the required settings that are absent, given a bucket.
    pub(crate) fn missing(&self, bucket: Option<&str>, require_endpoint: bool) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if bucket.is_none_or(str::is_empty) {
            missing.push("bucket");
        }
        if require_endpoint && is_blank(&self.endpoint) {
            missing.push("endpoint");
        }
        if is_blank(&self.access_key_id) {
            missing.push("access key id");
        }
        if is_blank(&self.secret_access_key) {
            missing.push("secret access key");
        }
        missing
    }

    /// Build an object store client for `bucket`.
    ///
    /// Without an endpoint the AWS default for the region is used. Plain
    /// `http://` endpoints (local MinIO and the like) are allowed.
    pub fn connect(
        &self,
        bucket: Option<&str>,
        require_endpoint: bool,
    ) -> Result<Arc<dyn ObjectStore>, StoreError> {
        let missing = self.missing(bucket, require_endpoint);
        if !missing.is_empty() {
            return Err(StoreError::Configuration(format!(
                "missing {}",
                missing.join(", ")
            )));
        }
        let bucket = bucket.unwrap_or_default();

        let mut builder = AmazonS3Builder::new().with_bucket_name(bucket);
        if let Some(key) = &self.access_key_id {
            builder = builder.with_access_key_id(key);
        }
        if let Some(secret) = &self.secret_access_key {
            builder = builder.with_secret_access_key(secret);
        }
        if let Some(region) = &self.region {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.is_empty()) {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }

        debug!(bucket, endpoint = ?self.endpoint, "connecting to object storage");
        Ok(Arc::new(builder.build()?))
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}
