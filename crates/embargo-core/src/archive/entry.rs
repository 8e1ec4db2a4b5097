use std::borrow::Cow;
use std::path::Path;

use tar::EntryType;

/// Substring that marks a measurement record subject to embargo.
pub const MEASUREMENT_MARKER: &str = "web100";

/// One record demultiplexed from a source archive.
///
/// `size` always equals `payload.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path within the archive, lossily decoded. Used for routing and logs.
    pub name: String,
    /// Path exactly as stored; written back unchanged.
    pub path_bytes: Vec<u8>,
    /// Target of a symlink or hard link.
    pub link_name: Option<Vec<u8>>,
    pub size: u64,
    /// Permission bits.
    pub mode: u32,
    /// Modification time, seconds since the Unix epoch.
    pub mtime: u64,
    pub entry_type: EntryType,
    pub payload: Vec<u8>,
}

impl ArchiveEntry {
    /// A regular file with mode 0644 and mtime 0.
    pub fn file(name: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        let payload = payload.into();
        let name = name.into();
        Self {
            path_bytes: name.as_bytes().to_vec(),
            name,
            link_name: None,
            size: payload.len() as u64,
            mode: 0o644,
            mtime: 0,
            entry_type: EntryType::Regular,
            payload,
        }
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_mtime(mut self, mtime: u64) -> Self {
        self.mtime = mtime;
        self
    }

    /// A symbolic link to `target`.
    pub fn symlink(name: impl Into<String>, target: impl Into<Vec<u8>>) -> Self {
        let mut entry = Self::file(name, Vec::<u8>::new());
        entry.entry_type = EntryType::Symlink;
        entry.mode = 0o777;
        entry.link_name = Some(target.into());
        entry
    }

    /// Stored path as a filesystem path, for handing back to `tar`.
    pub fn path(&self) -> Cow<'_, Path> {
        bytes_to_path(&self.path_bytes)
    }

    pub fn link_target(&self) -> Option<Cow<'_, Path>> {
        self.link_name.as_deref().map(bytes_to_path)
    }

    /// Final path component, which is what the embargo policy inspects.
    pub fn base_name(&self) -> &str {
        Path::new(&self.name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.name)
    }

    /// Whether this entry is a web100 measurement record.
    pub fn is_measurement(&self) -> bool {
        self.base_name().contains(MEASUREMENT_MARKER)
    }
}

#[cfg(unix)]
fn bytes_to_path(bytes: &[u8]) -> Cow<'_, Path> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    Cow::Borrowed(Path::new(OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
fn bytes_to_path(bytes: &[u8]) -> Cow<'_, Path> {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(s) => Cow::Borrowed(Path::new(s)),
        Cow::Owned(s) => Cow::Owned(s.into()),
    }
}
