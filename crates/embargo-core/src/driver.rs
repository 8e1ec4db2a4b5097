//! Bucket walker.
//!
//! Lists the source bucket, splits every eligible archive, and stores the
//! halves as `public/<name>` and `private/<name>` in the destination bucket.
//! Archives are processed one at a time, in listing order.

use std::sync::Arc;

use bytes::Bytes;
use serde::Deserialize;

use crate::archive::{split_archive_with_limits, Route, SplitLimits};
use crate::error::EmbargoError;
use crate::policy::EmbargoPolicy;
use crate::store::{split_object_name, Bucket};

/// Substrings an object name must contain to be split.
pub const DEFAULT_ARCHIVE_MARKERS: &[&str] = &["tgz", "sidestream"];

/// What to do when one archive fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Abort the run on the first failure.
    #[default]
    FailFast,
    /// Record the failure and move on to the next archive.
    Continue,
}

/// Selects eligible archives by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFilter {
    required: Vec<String>,
}

impl Default for ArchiveFilter {
    fn default() -> Self {
        Self::new(DEFAULT_ARCHIVE_MARKERS.iter().copied())
    }
}

impl ArchiveFilter {
    /// Names must contain every one of `required`.
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.required.iter().all(|marker| name.contains(marker.as_str()))
    }
}

/// One archive split and stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOutcome {
    pub archive: String,
    pub public_entries: usize,
    pub private_entries: usize,
}

#[derive(Debug)]
pub struct ArchiveFailure {
    pub archive: String,
    pub error: EmbargoError,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub processed: Vec<ArchiveOutcome>,
    /// Listed objects that did not match the archive filter.
    pub skipped: Vec<String>,
    /// Only populated in `FailureMode::Continue`.
    pub failures: Vec<ArchiveFailure>,
}

impl RunReport {
    /// True when every eligible archive was split and both halves stored.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total_entries(&self) -> usize {
        self.processed
            .iter()
            .map(|o| o.public_entries + o.private_entries)
            .sum()
    }
}

/// One embargo pass from a source bucket to a destination bucket.
pub struct EmbargoRun {
    source: Arc<dyn Bucket>,
    destination: Arc<dyn Bucket>,
    policy: Arc<EmbargoPolicy>,
    filter: ArchiveFilter,
    failure_mode: FailureMode,
    limits: SplitLimits,
}

impl EmbargoRun {
    pub fn new(
        source: Arc<dyn Bucket>,
        destination: Arc<dyn Bucket>,
        policy: Arc<EmbargoPolicy>,
    ) -> Self {
        Self {
            source,
            destination,
            policy,
            filter: ArchiveFilter::default(),
            failure_mode: FailureMode::default(),
            limits: SplitLimits::default(),
        }
    }

    pub fn with_filter(mut self, filter: ArchiveFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_failure_mode(mut self, failure_mode: FailureMode) -> Self {
        self.failure_mode = failure_mode;
        self
    }

    pub fn with_limits(mut self, limits: SplitLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Process every eligible archive in the source bucket.
    ///
    /// In fail-fast mode the first error is returned and later archives are
    /// left untouched. In continue mode per-archive errors are collected in
    /// the report; only a failed listing aborts the run.
    pub async fn run(&self) -> Result<RunReport, EmbargoError> {
        let names = self
            .source
            .list(None)
            .await
            .map_err(|source| EmbargoError::StoreUnavailable {
                bucket: self.source.name().to_string(),
                source,
            })?;

        tracing::info!(
            "embargo run: {} objects in {}, cutoff {}, {} whitelisted IPs",
            names.len(),
            self.source.name(),
            self.policy.cutoff(),
            self.policy.whitelist().len()
        );

        let mut report = RunReport::default();
        for name in names {
            if !self.filter.matches(&name) {
                tracing::debug!("skipping {}", name);
                report.skipped.push(name);
                continue;
            }

            match self.process_archive(&name).await {
                Ok(outcome) => report.processed.push(outcome),
                Err(error) => match self.failure_mode {
                    FailureMode::FailFast => return Err(error),
                    FailureMode::Continue => {
                        tracing::warn!("{}: {}", name, error);
                        report.failures.push(ArchiveFailure {
                            archive: name,
                            error,
                        });
                    }
                },
            }
        }

        tracing::info!(
            "embargo run finished: {} archives ({} entries), {} skipped, {} failed",
            report.processed.len(),
            report.total_entries(),
            report.skipped.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Fetch, split and store one archive.
    ///
    /// The public half is uploaded before the private half; nothing is
    /// uploaded unless the split fully succeeded.
    pub async fn process_archive(&self, name: &str) -> Result<ArchiveOutcome, EmbargoError> {
        tracing::info!("processing {}", name);

        let compressed =
            self.source
                .get(name)
                .await
                .map_err(|source| EmbargoError::FetchFailure {
                    name: name.to_string(),
                    source,
                })?;

        let split = split_archive_with_limits(&compressed, name, &self.policy, self.limits)
            .map_err(|source| EmbargoError::Split {
                archive: name.to_string(),
                source,
            })?;

        let outcome = ArchiveOutcome {
            archive: name.to_string(),
            public_entries: split.report.count(Route::Public),
            private_entries: split.report.count(Route::Private),
        };

        self.store(Route::Public, name, Bytes::from(split.public))
            .await?;
        self.store(Route::Private, name, Bytes::from(split.private))
            .await?;

        Ok(outcome)
    }

    async fn store(&self, route: Route, archive: &str, bytes: Bytes) -> Result<(), EmbargoError> {
        let object = split_object_name(route, archive);
        self.destination
            .put(&object, bytes)
            .await
            .map_err(|source| EmbargoError::UploadFailure {
                name: object.clone(),
                source,
            })?;
        tracing::debug!("stored {}/{}", self.destination.name(), object);
        Ok(())
    }
}
