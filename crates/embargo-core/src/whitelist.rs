//! IP whitelist loading.
//!
//! The whitelist is a newline-delimited list of IP address strings. Files
//! from whitelisted hosts are published even when they fall inside the
//! embargo window. It is loaded once per run, either from a local file or
//! from an object in the source bucket, and never changes afterwards.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::store::Bucket;

/// Default object name of the whitelist in the source bucket.
pub const DEFAULT_WHITELIST_OBJECT: &str = "whitelist";

#[derive(Debug, Error)]
pub enum WhitelistError {
    /// The source could not be opened or fetched. This is distinct from a
    /// whitelist that loaded successfully with zero entries.
    #[error("whitelist unavailable at '{location}': {reason}")]
    Unavailable { location: String, reason: String },

    #[error("failed to read whitelist '{location}': {source}")]
    Read {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

impl WhitelistError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Where the whitelist comes from.
///
/// ```yaml
/// whitelist:
///   object: whitelist        # object in the source bucket
/// # or
/// whitelist:
///   local: ./whitelist.txt
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhitelistSource {
    Local(PathBuf),
    Object(String),
}

impl Default for WhitelistSource {
    fn default() -> Self {
        Self::Object(DEFAULT_WHITELIST_OBJECT.to_string())
    }
}

impl WhitelistSource {
    /// Load from this source. Object sources are read from `bucket`.
    pub async fn load(&self, bucket: &dyn Bucket) -> Result<Whitelist, WhitelistError> {
        match self {
            Self::Local(path) => Whitelist::load_local(path),
            Self::Object(name) => Whitelist::load_from_bucket(bucket, name).await,
        }
    }
}

/// Set of whitelisted IP address strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    ips: HashSet<String>,
}

impl Whitelist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one IP per line.
    ///
    /// Line endings and surrounding whitespace are trimmed, duplicates
    /// collapse and blank lines are skipped, so the empty string is never a
    /// member. Empty input yields an empty whitelist.
    pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let mut ips = HashSet::new();
        for line in reader.lines() {
            let line = line?;
            let ip = line.trim();
            if ip.is_empty() {
                continue;
            }
            ips.insert(ip.to_string());
        }
        Ok(Self { ips })
    }

    /// Load from a local file.
    pub fn load_local(path: &Path) -> Result<Self, WhitelistError> {
        let location = path.display().to_string();
        let file = File::open(path).map_err(|e| WhitelistError::Unavailable {
            location: location.clone(),
            reason: e.to_string(),
        })?;

        let whitelist = Self::from_reader(BufReader::new(file))
            .map_err(|source| WhitelistError::Read { location, source })?;
        whitelist.log_loaded(&path.display().to_string());
        Ok(whitelist)
    }

    /// Load from an object in `bucket`.
    pub async fn load_from_bucket(bucket: &dyn Bucket, name: &str) -> Result<Self, WhitelistError> {
        let location = format!("{}/{}", bucket.name(), name);
        let bytes = bucket
            .get(name)
            .await
            .map_err(|e| WhitelistError::Unavailable {
                location: location.clone(),
                reason: e.to_string(),
            })?;

        let whitelist = Self::from_reader(bytes.as_ref())
            .map_err(|source| WhitelistError::Read {
                location: location.clone(),
                source,
            })?;
        whitelist.log_loaded(&location);
        Ok(whitelist)
    }

    pub fn contains(&self, ip: &str) -> bool {
        self.ips.contains(ip)
    }

    pub fn len(&self) -> usize {
        self.ips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ips.iter().map(String::as_str)
    }

    fn log_loaded(&self, location: &str) {
        if self.is_empty() {
            tracing::warn!("whitelist at {} is empty; every post-cutoff record will be embargoed", location);
        } else {
            tracing::info!("loaded {} whitelisted IPs from {}", self.len(), location);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Whitelist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let ips = iter
            .into_iter()
            .map(Into::into)
            .filter(|ip: &String| !ip.trim().is_empty())
            .collect();
        Self { ips }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ObjectStoreBucket;
    use bytes::Bytes;
    use std::io::Write;

    #[test]
    fn test_from_reader_basic() {
        let wl = Whitelist::from_reader("213.244.128.170\n4.34.58.34\n".as_bytes()).unwrap();
        assert_eq!(wl.len(), 2);
        assert!(wl.contains("213.244.128.170"));
        assert!(wl.contains("4.34.58.34"));
        assert!(!wl.contains("2001:4c08:2003:2::16"));
    }

    #[test]
    fn test_blank_lines_are_not_members() {
        let wl = Whitelist::from_reader("\n1.2.3.4\n\n   \n1.2.3.4\r\n".as_bytes()).unwrap();
        assert_eq!(wl.len(), 1);
        assert!(!wl.contains(""));
    }

    #[test]
    fn test_empty_source_is_empty_set() {
        let wl = Whitelist::from_reader("".as_bytes()).unwrap();
        assert!(wl.is_empty());
    }

    #[test]
    fn test_load_local() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "213.244.128.170").unwrap();
        writeln!(file, "2001:4c08:2003:2::15").unwrap();

        let wl = Whitelist::load_local(file.path()).unwrap();
        assert!(wl.contains("213.244.128.170"));
        assert!(wl.contains("2001:4c08:2003:2::15"));
        assert!(!wl.contains("2001:4c08:2003:2::16"));
    }

    #[test]
    fn test_load_local_missing_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = Whitelist::load_local(&dir.path().join("nope")).unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_load_from_bucket() {
        let bucket = ObjectStoreBucket::memory("sidestream-embargo");
        bucket
            .put("whitelist", Bytes::from("213.244.128.170\n"))
            .await
            .unwrap();

        let wl = WhitelistSource::default().load(&bucket).await.unwrap();
        assert_eq!(wl.len(), 1);
        assert!(wl.contains("213.244.128.170"));
    }

    #[tokio::test]
    async fn test_load_from_bucket_missing_is_unavailable() {
        let bucket = ObjectStoreBucket::memory("sidestream-embargo");
        let err = Whitelist::load_from_bucket(&bucket, "whitelist")
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_load_from_bucket_empty_object_is_empty_set() {
        let bucket = ObjectStoreBucket::memory("sidestream-embargo");
        bucket.put("whitelist", Bytes::new()).await.unwrap();

        let wl = Whitelist::load_from_bucket(&bucket, "whitelist")
            .await
            .unwrap();
        assert!(wl.is_empty());
    }

    #[test]
    fn test_from_iter_skips_blank() {
        let wl: Whitelist = ["1.1.1.1", "", "  "].into_iter().collect();
        assert_eq!(wl.len(), 1);
    }
}
