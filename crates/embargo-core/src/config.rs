//! YAML run configuration.
//!
//! ```yaml
//! version: 1
//! source: gs://scraper-mlab-oti
//! destination: gs://embargo-mlab-oti
//! cutoff: "20160305"
//! whitelist:
//!   object: whitelist
//! filter: [tgz, sidestream]
//! on_error: fail_fast
//! limits:
//!   max_decode_bytes: 4294967296
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::archive::{SplitLimits, SplitLimitsOverrides};
use crate::driver::{ArchiveFilter, FailureMode, DEFAULT_ARCHIVE_MARKERS};
use crate::policy::{EmbargoCutoff, PolicyError};
use crate::whitelist::WhitelistSource;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("unsupported config version {found} (supported: {})", SUPPORTED_CONFIG_VERSION)]
    UnsupportedVersion { found: u32 },

    #[error(transparent)]
    InvalidCutoff(#[from] PolicyError),

    #[error("missing {0}: set it in the config file or on the command line")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbargoConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Store URL of the bucket holding the raw archives.
    #[serde(default)]
    pub source: Option<String>,
    /// Store URL receiving `public/` and `private/` outputs.
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default = "default_cutoff")]
    pub cutoff: String,
    #[serde(default)]
    pub whitelist: WhitelistSource,
    #[serde(default = "default_filter")]
    pub filter: Vec<String>,
    #[serde(default)]
    pub on_error: FailureMode,
    #[serde(default)]
    pub limits: SplitLimitsOverrides,
}

fn default_version() -> u32 {
    SUPPORTED_CONFIG_VERSION
}

fn default_cutoff() -> String {
    EmbargoCutoff::DEFAULT.to_string()
}

fn default_filter() -> Vec<String> {
    DEFAULT_ARCHIVE_MARKERS.iter().map(|s| s.to_string()).collect()
}

impl Default for EmbargoConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            source: None,
            destination: None,
            cutoff: default_cutoff(),
            whitelist: WhitelistSource::default(),
            filter: default_filter(),
            on_error: FailureMode::default(),
            limits: SplitLimitsOverrides::default(),
        }
    }
}

impl EmbargoConfig {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            destination: Some(destination.into()),
            ..Self::default()
        }
    }

    pub fn cutoff(&self) -> Result<EmbargoCutoff, ConfigError> {
        Ok(self.cutoff.parse()?)
    }

    pub fn filter(&self) -> ArchiveFilter {
        ArchiveFilter::new(self.filter.iter().cloned())
    }

    pub fn limits(&self) -> SplitLimits {
        SplitLimits::default().apply(self.limits.clone())
    }

    pub fn source_url(&self) -> Result<&str, ConfigError> {
        self.source.as_deref().ok_or(ConfigError::Missing("source"))
    }

    pub fn destination_url(&self) -> Result<&str, ConfigError> {
        self.destination
            .as_deref()
            .ok_or(ConfigError::Missing("destination"))
    }
}

pub fn load_config(path: &Path) -> Result<EmbargoConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let cfg: EmbargoConfig = serde_yaml::from_str(&raw)?;
    if cfg.version != SUPPORTED_CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion { found: cfg.version });
    }
    // Cutoff must parse before any archive is touched.
    cfg.cutoff()?;
    Ok(cfg)
}
