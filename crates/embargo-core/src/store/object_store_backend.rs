//! Object store implementation of `Bucket`.
//!
//! Supports GCS, S3, and local filesystem via the `object_store` crate.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::{ObjectStore, PutPayload};

use super::{Bucket, KeyBuilder, StoreError, StoreResult, StoreSpec};

/// Bucket backed by `object_store`.
///
/// Supports:
/// - Google Cloud Storage (`gs://`), credentials from the environment
/// - S3 and S3-compatible (`s3://`)
/// - Local filesystem (`file://`)
/// - In-memory (for testing)
pub struct ObjectStoreBucket {
    inner: Arc<dyn ObjectStore>,
    keys: KeyBuilder,
    name: String,
}

impl ObjectStoreBucket {
    /// Create a bucket from a parsed spec.
    pub fn from_spec(spec: &StoreSpec) -> StoreResult<Self> {
        let inner: Arc<dyn ObjectStore> = match spec.scheme.as_str() {
            "memory" => Arc::new(object_store::memory::InMemory::new()),
            "file" => {
                let path = if let Some(bucket) = &spec.bucket {
                    format!("/{}/{}", bucket, spec.prefix)
                } else {
                    format!("/{}", spec.prefix)
                };
                // Ensure directory exists
                std::fs::create_dir_all(&path).map_err(|e| StoreError::Io {
                    message: format!("failed to create store directory {}: {}", path, e),
                })?;
                let local = object_store::local::LocalFileSystem::new_with_prefix(&path)
                    .map_err(|e| StoreError::NotConfigured {
                        message: format!("failed to create local store at {}: {}", path, e),
                    })?;
                // Local paths already include the prefix.
                return Ok(Self {
                    inner: Arc::new(local),
                    keys: KeyBuilder::new(""),
                    name: spec.display_name(),
                });
            }
            "gs" => {
                let bucket = Self::require_bucket(spec)?;
                let builder = object_store::gcp::GoogleCloudStorageBuilder::from_env()
                    .with_bucket_name(bucket);

                Arc::new(builder.build().map_err(|e| StoreError::NotConfigured {
                    message: format!("failed to create GCS client: {}", e),
                })?)
            }
            "s3" => {
                let bucket = Self::require_bucket(spec)?;
                let mut builder = object_store::aws::AmazonS3Builder::from_env()
                    .with_bucket_name(bucket)
                    .with_allow_http(false);

                if let Some(region) = &spec.region {
                    builder = builder.with_region(region);
                }

                Arc::new(builder.build().map_err(|e| StoreError::NotConfigured {
                    message: format!("failed to create S3 client: {}", e),
                })?)
            }
            scheme => {
                return Err(StoreError::InvalidSpec {
                    spec: spec.scheme.clone(),
                    reason: format!("unsupported scheme: {}", scheme),
                })
            }
        };

        Ok(Self {
            inner,
            keys: KeyBuilder::new(&spec.prefix),
            name: spec.display_name(),
        })
    }

    /// Create a bucket from a URL string.
    pub fn from_url(url: &str) -> StoreResult<Self> {
        let spec = StoreSpec::parse(url)?;
        Self::from_spec(&spec)
    }

    /// Create an in-memory bucket for testing.
    pub fn memory(name: &str) -> Self {
        Self::with_store(name, Arc::new(object_store::memory::InMemory::new()), "")
    }

    /// Wrap an existing store, e.g. to view one in-memory store through two
    /// prefixes.
    pub fn with_store(name: &str, inner: Arc<dyn ObjectStore>, prefix: &str) -> Self {
        Self {
            inner,
            keys: KeyBuilder::new(prefix),
            name: name.to_string(),
        }
    }

    fn require_bucket(spec: &StoreSpec) -> StoreResult<&str> {
        spec.bucket
            .as_deref()
            .ok_or_else(|| StoreError::InvalidSpec {
                spec: format!("{}://{}", spec.scheme, spec.prefix),
                reason: format!("{} URL must include bucket name", spec.scheme),
            })
    }
}

#[async_trait]
impl Bucket for ObjectStoreBucket {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list(&self, prefix: Option<&str>) -> StoreResult<Vec<String>> {
        let base = self.keys.list_prefix();

        let list = self.inner.list(base.as_ref());
        let entries: Vec<_> = list.try_collect().await.map_err(|e| StoreError::Io {
            message: format!("failed to list {}: {}", self.name, e),
        })?;

        let mut names: Vec<String> = entries
            .iter()
            .filter_map(|entry| self.keys.object_name(&entry.location))
            .filter(|name| prefix.map_or(true, |p| name.starts_with(p)))
            .collect();
        names.sort();

        Ok(names)
    }

    async fn get(&self, name: &str) -> StoreResult<Bytes> {
        let key = self.keys.object_key(name);

        let result = self
            .inner
            .get(&key)
            .await
            .map_err(|e| StoreError::from_object_store(e, name))?;

        result.bytes().await.map_err(|e| StoreError::Io {
            message: format!("failed to read {}/{}: {}", self.name, name, e),
        })
    }

    async fn put(&self, name: &str, bytes: Bytes) -> StoreResult<()> {
        let key = self.keys.object_key(name);
        self.inner
            .put(&key, PutPayload::from_bytes(bytes))
            .await
            .map_err(|e| StoreError::from_object_store(e, name))?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> StoreResult<()> {
        let key = self.keys.object_key(name);
        self.inner
            .delete(&key)
            .await
            .map_err(|e| StoreError::from_object_store(e, name))
    }

    async fn exists(&self, name: &str) -> StoreResult<bool> {
        let key = self.keys.object_key(name);
        match self.inner.head(&key).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(StoreError::Io {
                message: format!("failed to check existence of {}: {}", name, e),
            }),
        }
    }
}
