//! Bucket-to-bucket copy and prefix delete.

use crate::error::EmbargoError;
use crate::store::Bucket;

/// Result of a sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub copied: Vec<String>,
    /// Already present in the destination.
    pub skipped: Vec<String>,
}

/// Copy one object from `src` to `dst` under the same name.
pub async fn copy_object(src: &dyn Bucket, dst: &dyn Bucket, name: &str) -> Result<(), EmbargoError> {
    let bytes = src
        .get(name)
        .await
        .map_err(|source| EmbargoError::FetchFailure {
            name: name.to_string(),
            source,
        })?;
    dst.put(name, bytes)
        .await
        .map_err(|source| EmbargoError::UploadFailure {
            name: name.to_string(),
            source,
        })
}

/// Copy every object under `prefix` that `dst` does not already have.
///
/// Existing objects are never overwritten. Stops at the first failure.
pub async fn sync_buckets(
    src: &dyn Bucket,
    dst: &dyn Bucket,
    prefix: Option<&str>,
) -> Result<SyncReport, EmbargoError> {
    let names = list(src, prefix).await?;

    let mut report = SyncReport::default();
    for name in names {
        let present = dst
            .exists(&name)
            .await
            .map_err(|source| EmbargoError::StoreUnavailable {
                bucket: dst.name().to_string(),
                source,
            })?;
        if present {
            tracing::info!("{} already exists in {}, skipping", name, dst.name());
            report.skipped.push(name);
            continue;
        }

        copy_object(src, dst, &name).await?;
        tracing::debug!("copied {} from {} to {}", name, src.name(), dst.name());
        report.copied.push(name);
    }

    tracing::info!(
        "sync {} -> {}: {} copied, {} skipped",
        src.name(),
        dst.name(),
        report.copied.len(),
        report.skipped.len()
    );
    Ok(report)
}

/// Delete every object under `prefix`. Returns the number deleted.
pub async fn delete_prefix(bucket: &dyn Bucket, prefix: Option<&str>) -> Result<usize, EmbargoError> {
    let names = list(bucket, prefix).await?;
    for name in &names {
        bucket
            .delete(name)
            .await
            .map_err(|source| EmbargoError::DeleteFailure {
                name: name.clone(),
                source,
            })?;
        tracing::debug!("deleted {}/{}", bucket.name(), name);
    }
    tracing::info!("deleted {} objects from {}", names.len(), bucket.name());
    Ok(names.len())
}

async fn list(bucket: &dyn Bucket, prefix: Option<&str>) -> Result<Vec<String>, EmbargoError> {
    bucket
        .list(prefix)
        .await
        .map_err(|source| EmbargoError::StoreUnavailable {
            bucket: bucket.name().to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ObjectStoreBucket;
    use bytes::Bytes;

    #[tokio::test]
    async fn test_sync_skips_existing() {
        let src = ObjectStoreBucket::memory("src");
        let dst = ObjectStoreBucket::memory("dst");
        src.put("sidestream/a.tgz", Bytes::from("a")).await.unwrap();
        src.put("sidestream/b.tgz", Bytes::from("b")).await.unwrap();
        src.put("other/c.tgz", Bytes::from("c")).await.unwrap();
        dst.put("sidestream/a.tgz", Bytes::from("old")).await.unwrap();

        let report = sync_buckets(&src, &dst, Some("sidestream/")).await.unwrap();

        assert_eq!(report.copied, vec!["sidestream/b.tgz"]);
        assert_eq!(report.skipped, vec!["sidestream/a.tgz"]);
        assert_eq!(dst.get("sidestream/a.tgz").await.unwrap(), Bytes::from("old"));
        assert_eq!(dst.get("sidestream/b.tgz").await.unwrap(), Bytes::from("b"));
        assert!(!dst.exists("other/c.tgz").await.unwrap());
    }

    #[tokio::test]
    async fn test_copy_missing_object() {
        let src = ObjectStoreBucket::memory("src");
        let dst = ObjectStoreBucket::memory("dst");
        let err = copy_object(&src, &dst, "missing").await.unwrap_err();
        assert!(matches!(err, EmbargoError::FetchFailure { .. }));
    }

    #[tokio::test]
    async fn test_delete_prefix() {
        let bucket = ObjectStoreBucket::memory("b");
        for name in ["public/a.tgz", "public/b.tgz", "private/a.tgz"] {
            bucket.put(name, Bytes::from("x")).await.unwrap();
        }

        assert_eq!(delete_prefix(&bucket, Some("public/")).await.unwrap(), 2);
        assert_eq!(bucket.list(None).await.unwrap(), vec!["private/a.tgz"]);
        assert_eq!(delete_prefix(&bucket, None).await.unwrap(), 1);
        assert!(bucket.list(None).await.unwrap().is_empty());
    }
}
