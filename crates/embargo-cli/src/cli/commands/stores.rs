use std::sync::Arc;

use embargo_core::{Bucket, EmbargoError, ObjectStoreBucket};

/// Open a bucket from a store URL.
pub(crate) fn open(url: &str) -> Result<Arc<dyn Bucket>, EmbargoError> {
    let bucket = ObjectStoreBucket::from_url(url).map_err(|source| EmbargoError::StoreUnavailable {
        bucket: url.to_string(),
        source,
    })?;
    Ok(Arc::new(bucket))
}

/// Log a library error and turn it into an exit code.
pub(crate) fn fail(err: &EmbargoError) -> i32 {
    tracing::error!("{}", err);
    eprintln!("error: {}", err);
    err.exit_code()
}
