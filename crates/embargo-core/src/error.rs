//! Run-level error taxonomy.
//!
//! Policy ambiguity (unparseable dates, legacy filenames) never shows up
//! here: the policy resolves it to "embargoed" and processing continues.

use thiserror::Error;

use crate::archive::SplitError;
use crate::config::ConfigError;
use crate::store::StoreError;
use crate::whitelist::WhitelistError;

#[derive(Debug, Error)]
pub enum EmbargoError {
    /// The store could not be built or the source listing failed.
    #[error("object store unavailable ({bucket}): {source}")]
    StoreUnavailable {
        bucket: String,
        #[source]
        source: StoreError,
    },

    /// An object is missing or could not be downloaded.
    #[error("failed to fetch '{name}': {source}")]
    FetchFailure {
        name: String,
        #[source]
        source: StoreError,
    },

    /// The archive could not be split; nothing was uploaded for it.
    #[error("failed to split '{archive}': {source}")]
    Split {
        archive: String,
        #[source]
        source: SplitError,
    },

    /// The destination rejected a finalized output.
    #[error("failed to upload '{name}': {source}")]
    UploadFailure {
        name: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to delete '{name}': {source}")]
    DeleteFailure {
        name: String,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Whitelist(#[from] WhitelistError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EmbargoError {
    /// Suggested exit code for CLI.
    ///
    /// 1: an archive or object failed, 2: configuration, 3: access denied,
    /// 4: store or whitelist unavailable.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::StoreUnavailable { source, .. } => source.exit_code(),
            Self::FetchFailure { source, .. }
            | Self::UploadFailure { source, .. }
            | Self::DeleteFailure { source, .. }
                if source.is_access_denied() =>
            {
                3
            }
            Self::Config(_) => 2,
            Self::Whitelist(_) => 4,
            _ => 1,
        }
    }

    /// Name of the archive or object the error is about, if any.
    pub fn object_name(&self) -> Option<&str> {
        match self {
            Self::FetchFailure { name, .. }
            | Self::UploadFailure { name, .. }
            | Self::DeleteFailure { name, .. } => Some(name),
            Self::Split { archive, .. } => Some(archive),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let not_found = EmbargoError::FetchFailure {
            name: "a.tgz".into(),
            source: StoreError::NotFound {
                name: "a.tgz".into(),
            },
        };
        assert_eq!(not_found.exit_code(), 1);
        assert_eq!(not_found.object_name(), Some("a.tgz"));

        let unavailable = EmbargoError::StoreUnavailable {
            bucket: "src".into(),
            source: StoreError::Io {
                message: "down".into(),
            },
        };
        assert_eq!(unavailable.exit_code(), 4);
        assert_eq!(unavailable.object_name(), None);

        let denied = EmbargoError::UploadFailure {
            name: "private/a.tgz".into(),
            source: StoreError::AccessDenied {
                message: "no".into(),
            },
        };
        assert_eq!(denied.exit_code(), 3);

        let bad_url = EmbargoError::StoreUnavailable {
            bucket: "ftp://x".into(),
            source: StoreError::InvalidSpec {
                spec: "ftp://x".into(),
                reason: "unsupported scheme: ftp".into(),
            },
        };
        assert_eq!(bad_url.exit_code(), 2);
    }
}
