//! Bucket operation errors.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object not found: {name}")]
    NotFound { name: String },

    /// Credentials missing, rejected, or lacking permission.
    #[error("access denied: {message}")]
    AccessDenied { message: String },

    /// The store URL could not be parsed or names an unknown scheme.
    #[error("invalid store URL '{spec}': {reason}")]
    InvalidSpec { spec: String, reason: String },

    /// The backend client could not be built (e.g. bad credentials file).
    #[error("store not configured: {message}")]
    NotConfigured { message: String },

    /// Listing, transfer, or local filesystem failure.
    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("object store error on '{name}': {source}")]
    Backend {
        name: String,
        #[source]
        source: object_store::Error,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }

    /// Suggested exit code for CLI when the store itself is unusable.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AccessDenied { .. } => 3,
            Self::NotConfigured { .. } | Self::InvalidSpec { .. } => 2,
            _ => 4,
        }
    }

    /// Classify an `object_store` error on object `name`.
    pub fn from_object_store(err: object_store::Error, name: &str) -> Self {
        match err {
            object_store::Error::NotFound { .. } => Self::NotFound {
                name: name.to_string(),
            },
            object_store::Error::PermissionDenied { .. }
            | object_store::Error::Unauthenticated { .. } => Self::AccessDenied {
                message: format!("{}: {}", name, err),
            },
            source => Self::Backend {
                name: name.to_string(),
                source,
            },
        }
    }
}
