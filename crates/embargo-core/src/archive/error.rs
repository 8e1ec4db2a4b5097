use std::io;

use thiserror::Error;

use super::split::Route;

/// Failures while splitting one archive. Any of these aborts the archive;
/// no partial output is ever returned.
#[derive(Debug, Error)]
pub enum SplitError {
    /// The outer stream is not valid gzip data.
    #[error("failed to decompress archive: {source}")]
    Decompression {
        #[source]
        source: io::Error,
    },

    /// The decompressed stream exceeded `SplitLimits::max_decode_bytes`.
    #[error("decompressed archive exceeds limit of {limit} bytes")]
    Limit { limit: u64 },

    /// The inner tar stream is malformed.
    #[error("malformed archive at entry #{index}: {source}")]
    Demultiplex {
        index: usize,
        #[source]
        source: io::Error,
    },

    /// Appending an entry to an output archive failed.
    #[error("failed to append '{name}' to {route} archive: {source}")]
    Write {
        name: String,
        route: Route,
        #[source]
        source: io::Error,
    },

    /// Closing an output archive or its compressor failed.
    #[error("failed to finalize {route} archive: {source}")]
    Finalization {
        route: Route,
        #[source]
        source: io::Error,
    },
}
