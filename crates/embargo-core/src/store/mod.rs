//! Object storage abstraction.
//!
//! The splitter never talks to a storage backend directly. The driver hands
//! it bytes fetched through a [`Bucket`] and stores the results through
//! another one. Production buckets are backed by the `object_store` crate
//! (GCS, S3, local filesystem); tests use in-memory buckets.
//!
//! Authentication, retries and pagination are the backend's business.

pub mod error;
pub mod naming;
pub mod object_store_backend;

use async_trait::async_trait;
use bytes::Bytes;

pub use error::{StoreError, StoreResult};
pub use naming::{split_object_name, KeyBuilder, PRIVATE_PREFIX, PUBLIC_PREFIX};
pub use object_store_backend::ObjectStoreBucket;

/// Parsed store specification from CLI/config.
///
/// # Examples
///
/// ```text
/// gs://sidestream-embargo
/// s3://my-bucket/embargo?region=us-east-1
/// file:///tmp/embargo-store
/// memory://test
/// ```
#[derive(Debug, Clone)]
pub struct StoreSpec {
    /// The scheme (gs, s3, file, memory)
    pub scheme: String,
    /// Bucket name (empty for file://)
    pub bucket: Option<String>,
    /// Base prefix/path within the bucket
    pub prefix: String,
    /// Optional region (for S3)
    pub region: Option<String>,
}

impl StoreSpec {
    /// Parse a store URL like `gs://bucket/prefix` or `file:///path`.
    pub fn parse(url: &str) -> StoreResult<Self> {
        let url = url::Url::parse(url).map_err(|e| StoreError::InvalidSpec {
            spec: url.to_string(),
            reason: e.to_string(),
        })?;

        let scheme = match url.scheme() {
            "gcs" => "gs".to_string(),
            other => other.to_string(),
        };
        let bucket = url
            .host_str()
            .filter(|h| !h.is_empty())
            .map(|s| s.to_string());
        let prefix = url.path().trim_matches('/').to_string();

        // Extract region from query params if present
        let region = url
            .query_pairs()
            .find(|(k, _)| k == "region")
            .map(|(_, v)| v.to_string());

        Ok(Self {
            scheme,
            bucket,
            prefix,
            region,
        })
    }

    /// Check if this is a memory store (for testing).
    pub fn is_memory(&self) -> bool {
        self.scheme == "memory"
    }

    /// Check if this is a local file store.
    pub fn is_file(&self) -> bool {
        self.scheme == "file"
    }

    /// Human-readable bucket label for logs and error messages.
    pub fn display_name(&self) -> String {
        match (&self.bucket, self.prefix.is_empty()) {
            (Some(bucket), true) => bucket.clone(),
            (Some(bucket), false) => format!("{}/{}", bucket, self.prefix),
            (None, _) => format!("/{}", self.prefix),
        }
    }
}

/// A named object bucket.
///
/// Object names are relative to the bucket's base prefix. All operations are
/// async; callers in this crate await them one at a time.
#[async_trait]
pub trait Bucket: Send + Sync {
    /// Bucket label for logs.
    fn name(&self) -> &str;

    /// Names of all objects starting with `prefix` (plain string prefix, as
    /// GCS does it), sorted lexicographically.
    async fn list(&self, prefix: Option<&str>) -> StoreResult<Vec<String>>;

    /// Download an object.
    ///
    /// - `Err(StoreError::NotFound)` if it doesn't exist
    async fn get(&self, name: &str) -> StoreResult<Bytes>;

    /// Upload an object, replacing any existing one.
    async fn put(&self, name: &str, bytes: Bytes) -> StoreResult<()>;

    /// Delete an object.
    async fn delete(&self, name: &str) -> StoreResult<()>;

    /// Check if an object exists.
    async fn exists(&self, name: &str) -> StoreResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gs_spec() {
        let spec = StoreSpec::parse("gs://sidestream-embargo").unwrap();
        assert_eq!(spec.scheme, "gs");
        assert_eq!(spec.bucket, Some("sidestream-embargo".to_string()));
        assert_eq!(spec.prefix, "");
        assert_eq!(spec.display_name(), "sidestream-embargo");
    }

    #[test]
    fn test_parse_gcs_alias() {
        let spec = StoreSpec::parse("gcs://embargo-output/2017").unwrap();
        assert_eq!(spec.scheme, "gs");
        assert_eq!(spec.prefix, "2017");
    }

    #[test]
    fn test_parse_s3_with_region() {
        let spec = StoreSpec::parse("s3://my-bucket/prefix?region=us-west-2").unwrap();
        assert_eq!(spec.region, Some("us-west-2".to_string()));
    }

    #[test]
    fn test_parse_file_spec() {
        let spec = StoreSpec::parse("file:///tmp/embargo-store").unwrap();
        assert!(spec.is_file());
        assert!(spec.bucket.is_none());
        assert_eq!(spec.prefix, "tmp/embargo-store");
    }

    #[test]
    fn test_parse_memory_spec() {
        let spec = StoreSpec::parse("memory://test").unwrap();
        assert!(spec.is_memory());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            StoreSpec::parse("not a url"),
            Err(StoreError::InvalidSpec { .. })
        ));
    }
}
