//! In-memory zip assembly for batch output.
//!
//! Entries are deflate-compressed and stored flat (no directories). Entry
//! names are unique: a name that is already taken gets `-2`, `-3`, … inserted
//! before its extension.

use std::collections::HashSet;
use std::io::{Cursor, Write};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Single-writer zip builder over an in-memory buffer.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    names: HashSet<String>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            names: HashSet::new(),
        }
    }

    /// Add an entry and return the name it was stored under.
    pub fn add(&mut self, name: &str, bytes: &[u8]) -> Result<String, ArchiveError> {
        let entry_name = unique_entry_name(name, &self.names);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.writer.start_file(entry_name.as_str(), options)?;
        self.writer.write_all(bytes)?;
        self.names.insert(entry_name.clone());
        Ok(entry_name)
    }

    /// Finish the central directory and return the archive bytes.
    pub fn finish(self) -> Result<Vec<u8>, ArchiveError> {
        Ok(self.writer.finish()?.into_inner())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// First of `name`, `stem-2.ext`, `stem-3.ext`, … not in `taken`.
pub fn unique_entry_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    };
    (2..)
        .map(|n| format!("{stem}-{n}{ext}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::zip_entries;

    #[test]
    fn unique_name_passes_through_free_names() {
        let taken = HashSet::new();
        assert_eq!(unique_entry_name("a_10x10px.jpg", &taken), "a_10x10px.jpg");
    }

    #[test]
    fn unique_name_inserts_counter_before_extension() {
        let mut taken = HashSet::new();
        taken.insert("a_10x10px.jpg".to_string());
        assert_eq!(unique_entry_name("a_10x10px.jpg", &taken), "a_10x10px-2.jpg");

        taken.insert("a_10x10px-2.jpg".to_string());
        assert_eq!(unique_entry_name("a_10x10px.jpg", &taken), "a_10x10px-3.jpg");
    }

    #[test]
    fn unique_name_without_extension() {
        let mut taken = HashSet::new();
        taken.insert("README".to_string());
        assert_eq!(unique_entry_name("README", &taken), "README-2");
    }

    #[test]
    fn builds_readable_archive() {
        let mut builder = ArchiveBuilder::new();
        builder.add("one.jpg", b"first").unwrap();
        builder.add("two.png", b"second").unwrap();

        let bytes = builder.finish().unwrap();
        let entries = zip_entries(&bytes);
        assert_eq!(
            entries,
            vec![
                ("one.jpg".to_string(), b"first".to_vec()),
                ("two.png".to_string(), b"second".to_vec()),
            ]
        );
    }

    #[test]
    fn duplicate_names_are_renamed_not_rejected() {
        let mut builder = ArchiveBuilder::new();
        assert_eq!(builder.add("x.jpg", b"1").unwrap(), "x.jpg");
        assert_eq!(builder.add("x.jpg", b"2").unwrap(), "x-2.jpg");

        let names: Vec<String> = zip_entries(&builder.finish().unwrap())
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["x.jpg", "x-2.jpg"]);
    }

    #[test]
    fn entries_are_deflated() {
        let mut builder = ArchiveBuilder::new();
        builder.add("zeros.bin", &vec![0u8; 64 * 1024]).unwrap();
        let bytes = builder.finish().unwrap();
        assert!(bytes.len() < 8 * 1024);

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let entry = archive.by_index(0).unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
    }

    #[test]
    fn empty_archive_is_valid() {
        let bytes = ArchiveBuilder::new().finish().unwrap();
        assert!(zip_entries(&bytes).is_empty());
    }
}
