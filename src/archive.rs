//! Export archives.
//!
//! The pipeline writes through the [`ArchiveBuilder`] trait: open a folder,
//! append files into it, finalize into one container. [`ZipArchiveBuilder`]
//! is the in-memory zip implementation.
//!
//! # Layout
//!
//! ```text
//! map-symbols.zip
//! ├── 01_town/
//! │   ├── 0001.png
//! │   └── 0002.png
//! └── 03_hospital/
//!     └── 0001.png
//! ```

use std::future::Future;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ArchiveError;
use crate::icon::Icon;

// ============================================================================
// Naming
// ============================================================================

/// Lowercases `key` and collapses every run of other characters into `-`.
pub fn slugify(key: &str) -> String {
    let mut slug = String::with_capacity(key.len());
    let mut pending_dash = false;
    for ch in key.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Folder name for the category at 1-based `ordinal`: `"03_hospital"`.
pub fn folder_name(ordinal: usize, key: &str) -> String {
    format!("{ordinal:02}_{}", slugify(key))
}

/// File name for the 1-based `index`-th icon of a folder: `"0007.png"`.
pub fn file_name(index: usize) -> String {
    format!("{index:04}.{}", Icon::EXTENSION)
}

// ============================================================================
// ArchiveBuilder
// ============================================================================

/// Single-writer, append-only container for one run.
pub trait ArchiveBuilder {
    /// Starts a folder; later files go into it.
    fn folder(&mut self, name: &str) -> Result<(), ArchiveError>;

    /// Appends a file to the current folder.
    fn file(&mut self, name: &str, bytes: &[u8]) -> Result<(), ArchiveError>;

    /// Closes the container and returns its bytes.
    fn finalize(self) -> impl Future<Output = Result<Vec<u8>, ArchiveError>>;
}

// ============================================================================
// ZipArchiveBuilder
// ============================================================================

/// Builds a deflate-compressed zip in memory.
pub struct ZipArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    current: Option<String>,
    entries: usize,
}

impl ZipArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            current: None,
            entries: 0,
        }
    }
}

impl Default for ZipArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBuilder for ZipArchiveBuilder {
    fn folder(&mut self, name: &str) -> Result<(), ArchiveError> {
        self.writer.add_directory(format!("{name}/"), self.options)?;
        self.current = Some(name.to_string());
        Ok(())
    }

    fn file(&mut self, name: &str, bytes: &[u8]) -> Result<(), ArchiveError> {
        let folder = self
            .current
            .as_deref()
            .ok_or_else(|| ArchiveError::NoFolder(name.to_string()))?;
        self.writer.start_file(format!("{folder}/{name}"), self.options)?;
        self.writer.write_all(bytes)?;
        self.entries += 1;
        Ok(())
    }

    async fn finalize(self) -> Result<Vec<u8>, ArchiveError> {
        let bytes = self.writer.finish()?.into_inner();
        tracing::debug!(entries = self.entries, bytes = bytes.len(), "archive finalized");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::ZipArchive;

    #[test]
    fn naming_law() {
        assert_eq!(folder_name(3, "hospital"), "03_hospital");
        assert_eq!(file_name(7), "0007.png");
        assert_eq!(folder_name(12, "well"), "12_well");
        assert_eq!(file_name(6000), "6000.png");
    }

    #[test]
    fn slugify_normalizes_keys() {
        assert_eq!(slugify("hospital"), "hospital");
        assert_eq!(slugify("Battle Site"), "battle-site");
        assert_eq!(slugify("  old__mill!! "), "old-mill");
        assert_eq!(slugify("A/B"), "a-b");
    }

    #[test]
    fn file_without_folder_fails() {
        let mut builder = ZipArchiveBuilder::new();
        assert!(matches!(
            builder.file("0001.png", b"x"),
            Err(ArchiveError::NoFolder(_))
        ));
    }

    #[tokio::test]
    async fn writes_folders_and_files() {
        let mut builder = ZipArchiveBuilder::new();
        builder.folder("01_town").unwrap();
        builder.file(&file_name(1), b"first").unwrap();
        builder.file(&file_name(2), b"second").unwrap();
        builder.folder("03_hospital").unwrap();
        builder.file(&file_name(1), b"third").unwrap();
        assert_eq!(builder.entries, 3);

        let bytes = builder.finalize().await.unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "01_town/",
                "01_town/0001.png",
                "01_town/0002.png",
                "03_hospital/",
                "03_hospital/0001.png",
            ]
        );
    }
}
