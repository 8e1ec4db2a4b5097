use serde::Deserialize;
use std::io::Read;

/// Resource limits for splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitLimits {
    /// Cap on the decompressed size of one source archive.
    pub max_decode_bytes: u64,
}

impl Default for SplitLimits {
    fn default() -> Self {
        Self {
            max_decode_bytes: 4_u64 * 1024 * 1024 * 1024,
        }
    }
}

/// Partial overrides for `SplitLimits`, as read from config.
/// Merge with `SplitLimits::default().apply(overrides)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitLimitsOverrides {
    pub max_decode_bytes: Option<u64>,
}

impl SplitLimits {
    /// Apply overrides onto these limits. Only `Some` values override.
    pub fn apply(self, overrides: SplitLimitsOverrides) -> Self {
        Self {
            max_decode_bytes: overrides.max_decode_bytes.unwrap_or(self.max_decode_bytes),
        }
    }
}

/// A reader that fails once more than `limit` bytes would be produced.
pub(crate) struct LimitReader<R> {
    inner: R,
    limit: u64,
    read: u64,
    exceeded: bool,
}

impl<R: Read> LimitReader<R> {
    pub(crate) fn new(inner: R, limit: u64) -> Self {
        Self {
            inner,
            limit,
            read: 0,
            exceeded: false,
        }
    }

    pub(crate) fn exceeded(&self) -> bool {
        self.exceeded
    }
}

impl<R: Read> Read for LimitReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        if self.read >= self.limit {
            // Exactly at the limit is fine as long as the stream ends here.
            let mut probe = [0u8; 1];
            if self.inner.read(&mut probe)? == 0 {
                return Ok(0);
            }
            self.exceeded = true;
            return Err(std::io::Error::other(format!(
                "exceeded limit of {} bytes",
                self.limit
            )));
        }

        let max_to_read = (self.limit - self.read).min(buf.len() as u64) as usize;
        let n = self.inner.read(&mut buf[..max_to_read])?;
        self.read += n as u64;

        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_reader_allows_exact_size() {
        let data = vec![7u8; 16];
        let mut reader = LimitReader::new(data.as_slice(), 16);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out.len(), 16);
        assert!(!reader.exceeded());
    }

    #[test]
    fn test_limit_reader_rejects_overflow() {
        let data = vec![7u8; 17];
        let mut reader = LimitReader::new(data.as_slice(), 16);
        let mut out = Vec::new();
        assert!(reader.read_to_end(&mut out).is_err());
        assert!(reader.exceeded());
    }

    #[test]
    fn test_overrides_apply() {
        let limits = SplitLimits::default().apply(SplitLimitsOverrides {
            max_decode_bytes: Some(1024),
        });
        assert_eq!(limits.max_decode_bytes, 1024);

        let unchanged = SplitLimits::default().apply(SplitLimitsOverrides::default());
        assert_eq!(unchanged, SplitLimits::default());
    }
}
