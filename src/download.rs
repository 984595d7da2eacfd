//! Delivery of finished archives.

use std::path::{Path, PathBuf};

/// Receives the finished container. Fire-and-forget: the pipeline does not
/// wait on or inspect the outcome.
pub trait Downloader {
    fn trigger(&self, container: Vec<u8>, filename: &str);
}

/// Saves archives into a directory.
///
/// Write failures are logged and otherwise dropped.
#[derive(Debug, Clone)]
pub struct DirectoryDownloader {
    dir: PathBuf,
}

impl DirectoryDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Downloader for DirectoryDownloader {
    fn trigger(&self, container: Vec<u8>, filename: &str) {
        let path = self.dir.join(filename);
        let result = std::fs::create_dir_all(&self.dir).and_then(|()| std::fs::write(&path, &container));
        match result {
            Ok(()) => tracing::info!(path = %path.display(), bytes = container.len(), "archive saved"),
            Err(e) => tracing::error!(path = %path.display(), error = %e, "failed to save archive"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_into_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("exports");
        let downloader = DirectoryDownloader::new(&target);

        downloader.trigger(vec![1, 2, 3], "symbols.zip");

        assert_eq!(std::fs::read(target.join("symbols.zip")).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn failures_do_not_panic() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        // A regular file where the directory should be.
        DirectoryDownloader::new(&blocker).trigger(vec![0], "out.zip");
        assert!(!blocker.join("out.zip").exists());
    }
}
