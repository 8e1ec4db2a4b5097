use std::fmt;

use super::entry::ArchiveEntry;
use super::error::SplitError;
use super::limits::SplitLimits;
use super::tar_read::{decompress, for_each_entry};
use super::tar_write::{close_compressor, ArchiveBuilder};
use crate::policy::EmbargoPolicy;

/// Which output archive an entry went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Public,
    Private,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Public => f.write_str("public"),
            Route::Private => f.write_str("private"),
        }
    }
}

impl Route {
    /// Non-measurement entries are always public; web100 records are routed
    /// by the policy on their base filename.
    pub fn for_entry(entry: &ArchiveEntry, policy: &EmbargoPolicy) -> Self {
        if entry.is_measurement() && policy.should_embargo(entry.base_name()) {
            Route::Private
        } else {
            Route::Public
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedEntry {
    pub name: String,
    pub route: Route,
}

/// Routing decisions of one split, in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    pub entries: Vec<RoutedEntry>,
}

impl SplitReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, route: Route) -> usize {
        self.entries.iter().filter(|e| e.route == route).count()
    }

    pub fn names(&self, route: Route) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |e| e.route == route)
            .map(|e| e.name.as_str())
    }
}

/// Two finalized gzip-compressed tar archives plus the routing report.
#[derive(Debug, Clone)]
pub struct SplitArchive {
    pub public: Vec<u8>,
    pub private: Vec<u8>,
    pub report: SplitReport,
}

/// Split a gzip-compressed tar into public and private archives.
///
/// Entries keep their relative order within each output. Both outputs are
/// valid archives even when empty. On any error nothing is returned.
pub fn split_archive(
    compressed: &[u8],
    archive_name: &str,
    policy: &EmbargoPolicy,
) -> Result<SplitArchive, SplitError> {
    split_archive_with_limits(compressed, archive_name, policy, SplitLimits::default())
}

/// Split with explicit resource limits.
pub fn split_archive_with_limits(
    compressed: &[u8],
    archive_name: &str,
    policy: &EmbargoPolicy,
    limits: SplitLimits,
) -> Result<SplitArchive, SplitError> {
    let unpacked = decompress(compressed, &limits)?;

    let mut public = ArchiveBuilder::new();
    let mut private = ArchiveBuilder::new();
    let mut report = SplitReport::default();

    for_each_entry(&unpacked, |entry| {
        let route = Route::for_entry(&entry, policy);
        tracing::debug!("{}: {} -> {}", archive_name, entry.name, route);

        let builder = match route {
            Route::Public => &mut public,
            Route::Private => &mut private,
        };
        builder
            .append(&entry)
            .map_err(|source| SplitError::Write {
                name: entry.name.clone(),
                route,
                source,
            })?;

        report.entries.push(RoutedEntry {
            name: entry.name,
            route,
        });
        Ok(())
    })?;

    debug_assert_eq!(public.len() + private.len(), report.len());

    // Both tar writers close before either compressor.
    let public_gz = public
        .close_archive()
        .map_err(|source| SplitError::Finalization {
            route: Route::Public,
            source,
        })?;
    let private_gz = private
        .close_archive()
        .map_err(|source| SplitError::Finalization {
            route: Route::Private,
            source,
        })?;
    let public = close_compressor(public_gz).map_err(|source| SplitError::Finalization {
        route: Route::Public,
        source,
    })?;
    let private = close_compressor(private_gz).map_err(|source| SplitError::Finalization {
        route: Route::Private,
        source,
    })?;

    tracing::info!(
        "split {}: {} entries, {} public, {} private",
        archive_name,
        report.len(),
        report.count(Route::Public),
        report.count(Route::Private)
    );

    Ok(SplitArchive {
        public,
        private,
        report,
    })
}
