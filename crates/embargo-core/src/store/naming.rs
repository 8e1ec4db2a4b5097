//! Key naming conventions.
//!
//! ```text
//! {base_prefix}/{name}                 # any object in a bucket
//! {base_prefix}/public/{archive}       # public half of a split archive
//! {base_prefix}/private/{archive}      # embargoed half of a split archive
//! ```
//!
//! Object names handed to and returned from a `Bucket` are always relative
//! to the base prefix, so a bucket rooted at `gs://b/embargo` and one rooted
//! at `gs://b` see different names for the same key.

use object_store::path::Path;

use crate::archive::Route;

pub const PUBLIC_PREFIX: &str = "public";
pub const PRIVATE_PREFIX: &str = "private";

/// Destination object name for one half of a split archive.
pub fn split_object_name(route: Route, archive_name: &str) -> String {
    let prefix = match route {
        Route::Public => PUBLIC_PREFIX,
        Route::Private => PRIVATE_PREFIX,
    };
    format!("{}/{}", prefix, archive_name)
}

/// Builder for storage keys.
#[derive(Debug, Clone)]
pub struct KeyBuilder {
    /// Base prefix (e.g., "sidestream/2017")
    base_prefix: String,
}

impl KeyBuilder {
    /// Create a new key builder with the given base prefix.
    pub fn new(base_prefix: impl Into<String>) -> Self {
        let mut prefix = base_prefix.into();
        // Normalize: remove leading/trailing slashes
        prefix = prefix.trim_matches('/').to_string();
        Self {
            base_prefix: prefix,
        }
    }

    /// Full key for an object name.
    pub fn object_key(&self, name: &str) -> Path {
        let name = name.trim_start_matches('/');
        if self.base_prefix.is_empty() {
            Path::from(name)
        } else {
            Path::from(format!("{}/{}", self.base_prefix, name))
        }
    }

    /// Prefix to list the whole bucket view, `None` when unprefixed.
    pub fn list_prefix(&self) -> Option<Path> {
        if self.base_prefix.is_empty() {
            None
        } else {
            Some(Path::from(self.base_prefix.as_str()))
        }
    }

    /// Object name of a key, or `None` if the key is outside the base prefix.
    pub fn object_name(&self, key: &Path) -> Option<String> {
        let key_str = key.as_ref();
        if self.base_prefix.is_empty() {
            return Some(key_str.to_string());
        }
        key_str
            .strip_prefix(self.base_prefix.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty())
            .map(|rest| rest.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_object_names() {
        assert_eq!(
            split_object_name(Route::Public, "sidestream_2017.tgz"),
            "public/sidestream_2017.tgz"
        );
        assert_eq!(
            split_object_name(Route::Private, "sidestream_2017.tgz"),
            "private/sidestream_2017.tgz"
        );
    }

    #[test]
    fn test_object_key() {
        let kb = KeyBuilder::new("/embargo/");
        let key = kb.object_key("public/a.tgz");
        assert_eq!(key.as_ref(), "embargo/public/a.tgz");
    }

    #[test]
    fn test_object_key_no_prefix() {
        let kb = KeyBuilder::new("");
        assert_eq!(kb.object_key("a.tgz").as_ref(), "a.tgz");
        assert!(kb.list_prefix().is_none());
    }

    #[test]
    fn test_object_name_roundtrip() {
        let kb = KeyBuilder::new("embargo");
        let key = kb.object_key("private/x.tgz");
        assert_eq!(kb.object_name(&key), Some("private/x.tgz".to_string()));
    }

    #[test]
    fn test_object_name_outside_prefix() {
        let kb = KeyBuilder::new("embargo");
        assert_eq!(kb.object_name(&Path::from("embargoed/x.tgz")), None);
        assert_eq!(kb.object_name(&Path::from("other/x.tgz")), None);
    }
}
