//! Archive splitting.
//!
//! A source archive is a gzip-compressed tar whose entries are individual
//! sidestream records (themselves compressed files). Splitting rebuilds it
//! into two gzip-compressed tars, one public and one private, without losing
//! or duplicating any entry.

pub mod entry;
pub mod error;
pub mod limits;
pub mod split;
mod tar_read;
mod tar_write;

pub use entry::{ArchiveEntry, MEASUREMENT_MARKER};
pub use error::SplitError;
pub use limits::{SplitLimits, SplitLimitsOverrides};
pub use split::{split_archive, split_archive_with_limits, Route, RoutedEntry, SplitArchive, SplitReport};
