// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Historical archive access.
//!
//! A historical archive is a ZIP file holding many dated record files.
//! Members are matched on their file name only, so `2019/2019-01-10.csv`
//! inside the archive answers a lookup for `2019-01-10.csv`.

use crate::Result;
use bytes::Bytes;
use diagnostics::*;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Read-only view of an archive held in memory
pub struct HistoricalArchive {
    inner: ZipArchive<Cursor<Bytes>>,
}

impl HistoricalArchive {
    /// Open `content` as a ZIP archive. Structural corruption is an error.
    pub fn open(content: Bytes) -> Result<Self> {
        let inner = ZipArchive::new(Cursor::new(content))?;
        Ok(Self { inner })
    }

    /// Number of entries, directories included
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Full names of the file entries, in archive order
    pub fn member_names(&self) -> Vec<String> {
        self.inner
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(str::to_string)
            .collect()
    }

    /// Read the first file entry whose file name equals `member`.
    ///
    /// Returns `Ok(None)` when no entry matches.
    pub fn lookup(&mut self, member: &str) -> Result<Option<Bytes>> {
        let Some(full_name) = self.find(member) else {
            let entries = self.inner.len();
            debug!("Archive member {member} not found among {entries} entries", member, entries);
            return Ok(None);
        };

        let mut entry = self.inner.by_name(&full_name)?;
        let mut buf = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or_default());
        let _ = entry.read_to_end(&mut buf)?;

        let size = buf.len();
        debug!("Read archive member {full_name} ({size} bytes)", full_name, size);
        Ok(Some(Bytes::from(buf)))
    }

    fn find(&self, member: &str) -> Option<String> {
        // file_names() follows central-directory order, so the first match wins
        self.inner
            .file_names()
            .find(|name| !name.ends_with('/') && file_name_of(name) == member)
            .map(str::to_string)
    }
}

fn file_name_of(entry_name: &str) -> &str {
    entry_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(entry_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &[u8])]) -> Bytes {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                writer.write_all(content).unwrap();
            }
        }
        Bytes::from(writer.finish().unwrap().into_inner())
    }

    #[test]
    fn test_lookup_exact_member() {
        let zip = build_zip(&[
            ("2019-01-09.csv", b"2019-01-09T00:00:00;1\n"),
            ("2019-01-10.csv", b"2019-01-10T00:00:00;2\n"),
        ]);
        let mut archive = HistoricalArchive::open(zip).unwrap();
        assert_eq!(archive.len(), 2);

        let content = archive.lookup("2019-01-10.csv").unwrap().unwrap();
        assert_eq!(&content[..], b"2019-01-10T00:00:00;2\n");
    }

    #[test]
    fn test_lookup_missing_member() {
        let zip = build_zip(&[("2019-01-09.csv", b"x")]);
        let mut archive = HistoricalArchive::open(zip).unwrap();
        assert!(archive.lookup("2019-01-10.csv").unwrap().is_none());
    }

    #[test]
    fn test_lookup_is_case_sensitive_and_exact() {
        let zip = build_zip(&[("2019-01-10.CSV", b"x"), ("2019-01-10.csv.bak", b"y")]);
        let mut archive = HistoricalArchive::open(zip).unwrap();
        assert!(archive.lookup("2019-01-10.csv").unwrap().is_none());
    }

    #[test]
    fn test_lookup_matches_nested_file_name() {
        let zip = build_zip(&[
            ("historical/", b""),
            ("historical/2019-01-10.csv", b"nested"),
        ]);
        let mut archive = HistoricalArchive::open(zip).unwrap();
        assert_eq!(archive.member_names(), vec!["historical/2019-01-10.csv"]);

        let content = archive.lookup("2019-01-10.csv").unwrap().unwrap();
        assert_eq!(&content[..], b"nested");
        assert!(archive.lookup("historical").unwrap().is_none());
    }

    #[test]
    fn test_lookup_empty_member() {
        let zip = build_zip(&[("2019-01-10.csv", b"")]);
        let mut archive = HistoricalArchive::open(zip).unwrap();
        let content = archive.lookup("2019-01-10.csv").unwrap().unwrap();
        assert!(content.is_empty());
    }

    #[test]
    fn test_open_rejects_non_archive() {
        let result = HistoricalArchive::open(Bytes::from_static(b"Temperature"));
        assert!(matches!(result, Err(crate::ReadingsError::Archive(_))));
    }

    #[test]
    fn test_file_name_of() {
        assert_eq!(file_name_of("a/b/c.csv"), "c.csv");
        assert_eq!(file_name_of("a\\c.csv"), "c.csv");
        assert_eq!(file_name_of("c.csv"), "c.csv");
    }
}
