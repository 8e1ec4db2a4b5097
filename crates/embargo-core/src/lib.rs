pub mod archive;
pub mod config;
pub mod driver;
pub mod error;
pub mod policy;
pub mod store;
pub mod sync;
pub mod whitelist;

// Convenience re-exports
pub use archive::{split_archive, ArchiveEntry, Route, SplitArchive, SplitError, SplitLimits};
pub use config::{load_config, ConfigError, EmbargoConfig};
pub use driver::{ArchiveFailure, ArchiveFilter, ArchiveOutcome, EmbargoRun, FailureMode, RunReport};
pub use error::EmbargoError;
pub use policy::{extract_local_ip, EmbargoCutoff, EmbargoDecision, EmbargoPolicy};
pub use store::{split_object_name, Bucket, ObjectStoreBucket, StoreError, StoreSpec};
pub use sync::{copy_object, delete_prefix, sync_buckets, SyncReport};
pub use whitelist::{Whitelist, WhitelistError, WhitelistSource};

// Re-export bytes for CLI convenience
pub use bytes::Bytes;
