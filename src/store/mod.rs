//! Download directory as an explicit resource handle.
//!
//! The directory is shared mutable state: every download writes into it and
//! the cleanup endpoint clears it wholesale. Passing a handle through
//! application state (rather than a process global) keeps that sharing
//! visible at every call site. Known weaknesses, kept deliberately: two
//! downloads sharing a base name within the same millisecond can collide,
//! and a cleanup racing an in-flight download can delete a file before it
//! is served.

use std::io;
use std::path::{Path, PathBuf};

/// Handle to the shared download directory.
#[derive(Debug, Clone)]
pub struct DownloadStore {
    root: PathBuf,
}

impl DownloadStore {
    /// Open the store, creating the directory if absent.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// First entry whose file name starts with `prefix`.
    ///
    /// First match wins; the uniqueness token in the base name makes an
    /// ambiguous prefix unlikely but not impossible.
    pub async fn find_by_prefix(&self, prefix: &str) -> io::Result<Option<PathBuf>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_name().to_string_lossy().starts_with(prefix) {
                return Ok(Some(entry.path()));
            }
        }
        Ok(None)
    }

    /// Delete every entry, ignoring individual failures. Returns the number
    /// of entries successfully removed.
    pub async fn clear(&self) -> io::Result<usize> {
        let mut removed = 0usize;
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let result = match entry.file_type().await {
                Ok(ft) if ft.is_dir() => tokio::fs::remove_dir_all(&path).await,
                Ok(_) => tokio::fs::remove_file(&path).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove entry"),
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("nested").join("downloads");
        let store = DownloadStore::open(&root).unwrap();
        assert!(store.root().is_dir());
    }

    #[test]
    fn finds_file_by_prefix() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DownloadStore::open(tmp.path()).unwrap();
        std::fs::write(tmp.path().join("My Video-1700000000123.webm"), b"x").unwrap();

        tokio_test::block_on(async {
            let found = store.find_by_prefix("My Video-1700000000123").await.unwrap();
            assert!(found.is_some());
            assert!(found
                .unwrap()
                .file_name()
                .unwrap()
                .to_string_lossy()
                .ends_with(".webm"));

            let missing = store.find_by_prefix("Other Video").await.unwrap();
            assert!(missing.is_none());
        });
    }

    #[test]
    fn clear_removes_everything_and_counts() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DownloadStore::open(tmp.path()).unwrap();
        std::fs::write(tmp.path().join("a.mp4"), b"x").unwrap();
        std::fs::write(tmp.path().join("b.mp3"), b"x").unwrap();
        std::fs::create_dir(tmp.path().join("partial")).unwrap();

        tokio_test::block_on(async {
            assert_eq!(store.clear().await.unwrap(), 3);
            assert_eq!(store.clear().await.unwrap(), 0);
        });
    }
}
