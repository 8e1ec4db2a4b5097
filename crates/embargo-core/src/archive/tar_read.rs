use std::io::{Cursor, Read};

use flate2::read::MultiGzDecoder;

use super::entry::ArchiveEntry;
use super::error::SplitError;
use super::limits::{LimitReader, SplitLimits};

/// Decompress the whole outer gzip stream into memory. Concatenated gzip
/// members are decoded as one stream.
pub(crate) fn decompress(compressed: &[u8], limits: &SplitLimits) -> Result<Vec<u8>, SplitError> {
    let decoder = MultiGzDecoder::new(compressed);
    let mut limited = LimitReader::new(decoder, limits.max_decode_bytes);

    let mut unpacked = Vec::new();
    if let Err(source) = limited.read_to_end(&mut unpacked) {
        if limited.exceeded() {
            return Err(SplitError::Limit {
                limit: limits.max_decode_bytes,
            });
        }
        return Err(SplitError::Decompression { source });
    }
    Ok(unpacked)
}

/// Visit every entry of an uncompressed tar stream in stored order.
///
/// Each entry is read fully and handed to `visit` with a fresh copy of its
/// metadata; the input header is not carried over.
pub(crate) fn for_each_entry<F>(tar_bytes: &[u8], mut visit: F) -> Result<usize, SplitError>
where
    F: FnMut(ArchiveEntry) -> Result<(), SplitError>,
{
    let mut archive = tar::Archive::new(Cursor::new(tar_bytes));
    let entries = archive
        .entries()
        .map_err(|source| SplitError::Demultiplex { index: 0, source })?;

    let mut count = 0;
    for (index, entry) in entries.enumerate() {
        let demux = |source: std::io::Error| SplitError::Demultiplex { index, source };

        let mut entry = entry.map_err(demux)?;
        let path_bytes = entry.path_bytes().into_owned();
        let name = String::from_utf8_lossy(&path_bytes).into_owned();
        let link_name = entry.link_name_bytes().map(|target| target.into_owned());
        let size = entry.size();
        let header = entry.header();
        let mode = header.mode().map_err(demux)?;
        let mtime = header.mtime().map_err(demux)?;
        let entry_type = header.entry_type();
        let link_name = link_name.filter(|_| entry_type.is_symlink() || entry_type.is_hard_link());

        let capacity = size.min(tar_bytes.len() as u64) as usize;
        let mut payload = Vec::with_capacity(capacity);
        entry.read_to_end(&mut payload).map_err(demux)?;

        if payload.len() as u64 != size {
            return Err(demux(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!(
                    "'{}' declares {} bytes but holds {}",
                    name,
                    size,
                    payload.len()
                ),
            )));
        }

        visit(ArchiveEntry {
            name,
            path_bytes,
            link_name,
            size,
            mode,
            mtime,
            entry_type,
            payload,
        })?;
        count += 1;
    }

    Ok(count)
}
