//! Shared fixtures: tar.gz archives built in memory.

#![allow(dead_code)]

use std::io::Read;

use embargo_core::{EmbargoPolicy, Whitelist};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

pub const LISTED_IP: &str = "213.244.128.170";

pub fn policy() -> EmbargoPolicy {
    let whitelist: Whitelist = [LISTED_IP].into_iter().collect();
    EmbargoPolicy::new("20160305".parse().unwrap(), whitelist)
}

/// Build a gzip-compressed tar from `(path, payload)` pairs.
pub fn build_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut tar = tar::Builder::new(encoder);
    for (path, payload) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(payload.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(1_488_063_600);
        tar.append_data(&mut header, path, *payload).unwrap();
    }
    tar.into_inner().unwrap().finish().unwrap()
}

/// Entry paths and payloads of a gzip-compressed tar, in stored order.
pub fn read_archive(compressed: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut raw = Vec::new();
    GzDecoder::new(compressed).read_to_end(&mut raw).unwrap();

    let mut archive = tar::Archive::new(raw.as_slice());
    let mut out = Vec::new();
    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        let path = entry.path().unwrap().to_string_lossy().into_owned();
        let mut payload = Vec::new();
        entry.read_to_end(&mut payload).unwrap();
        out.push((path, payload));
    }
    out
}

pub fn names(entries: &[(String, Vec<u8>)]) -> Vec<&str> {
    entries.iter().map(|(name, _)| name.as_str()).collect()
}

/// One hour of sidestream output from a host: index file, two records from
/// a non-whitelisted IP, one from a whitelisted IP, one legacy record.
pub fn sidestream_hour() -> Vec<u8> {
    build_archive(&[
        ("2017/02/25/index.txt", b"4 files"),
        (
            "2017/02/25/20170225T23:00:00Z_4.34.58.34_0.web100.gz",
            b"embargoed-0",
        ),
        (
            "2017/02/25/20170225T23:00:00Z_213.244.128.170_0.web100.gz",
            b"listed",
        ),
        (
            "2017/02/25/20170225T23:00:00Z_4.34.58.34_1.web100.gz",
            b"embargoed-1",
        ),
        ("2017/02/25/20170225T23:00:00Z_ALL0.web100.gz", b"legacy"),
    ])
}
