use std::io;

use flate2::write::GzEncoder;
use flate2::{Compression, GzBuilder};
use tar::{Builder, Header};

use super::entry::ArchiveEntry;

/// An output archive being populated: tar builder over a gzip encoder over
/// an in-memory buffer.
pub(crate) struct ArchiveBuilder {
    tar: Builder<GzEncoder<Vec<u8>>>,
    entries: usize,
}

impl ArchiveBuilder {
    pub(crate) fn new() -> Self {
        let encoder = GzBuilder::new().write(Vec::new(), Compression::default());
        Self {
            tar: Builder::new(encoder),
            entries: 0,
        }
    }

    /// Append `entry` under a freshly built header.
    pub(crate) fn append(&mut self, entry: &ArchiveEntry) -> io::Result<()> {
        let mut header = Header::new_gnu();
        header.set_entry_type(entry.entry_type);
        header.set_size(entry.size);
        header.set_mode(entry.mode);
        header.set_mtime(entry.mtime);

        // Both calls set the path (with GNU long-name records when needed)
        // and the checksum.
        match entry.link_target() {
            Some(target) => self.tar.append_link(&mut header, entry.path(), target)?,
            None => self
                .tar
                .append_data(&mut header, entry.path(), entry.payload.as_slice())?,
        }
        self.entries += 1;
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries
    }

    /// Write the tar end-of-archive blocks and hand back the compressor,
    /// which still has to be finished.
    pub(crate) fn close_archive(self) -> io::Result<GzEncoder<Vec<u8>>> {
        self.tar.into_inner()
    }
}

/// Write the gzip trailer and return the compressed bytes.
pub(crate) fn close_compressor(encoder: GzEncoder<Vec<u8>>) -> io::Result<Vec<u8>> {
    encoder.finish()
}
