//! Scanner collaborator contracts.
//!
//! Library scanners run upstream of the scheduler and produce the media it
//! consumes. Only their interfaces live here: the filesystem surface a
//! scanner needs, the progress publisher, and the folder etag cache used to
//! skip unchanged subtrees. Etags are opaque strings; only equality
//! matters.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use rustc_hash::FxHashMap;

/// Filesystem surface consumed by library scanners.
pub trait LocalFileSystem {
    fn list_subdirectories(&self, path: &Path) -> std::io::Result<Vec<PathBuf>>;
    fn list_files(&self, path: &Path) -> std::io::Result<Vec<PathBuf>>;
    fn file_exists(&self, path: &Path) -> bool;
    fn last_write_time(&self, path: &Path) -> std::io::Result<SystemTime>;
}

/// Unary progress publisher: `(library_id, progress in [0, 1])`.
pub trait ProgressSink {
    fn publish(&self, library_id: i64, progress: f64);
}

/// Folder etag cache: lets a scanner skip subtrees whose etag is unchanged.
#[derive(Debug, Default)]
pub struct FolderEtagCache {
    etags: FxHashMap<PathBuf, String>,
}

impl FolderEtagCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored etag for a folder, if any.
    pub fn etag(&self, folder: &Path) -> Option<&str> {
        self.etags.get(folder).map(String::as_str)
    }

    /// Whether the folder's stored etag equals `etag`.
    pub fn is_unchanged(&self, folder: &Path, etag: &str) -> bool {
        self.etag(folder) == Some(etag)
    }

    /// Record the folder's etag; returns `true` when the value changed.
    pub fn record(&mut self, folder: impl Into<PathBuf>, etag: impl Into<String>) -> bool {
        let folder = folder.into();
        let etag = etag.into();
        match self.etags.insert(folder, etag.clone()) {
            Some(previous) => previous != etag,
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.etags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.etags.is_empty()
    }
}
