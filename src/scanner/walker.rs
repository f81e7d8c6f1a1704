//! Directory walker built on walkdir.
//!
//! # Overview
//!
//! The [`Walker`] is the traversal collaborator of the duplicate pipeline:
//! it flattens a directory tree into file entries with their sizes. Every
//! per-entry failure (unreadable directory, vanished file, failed size
//! query) is yielded inline as an `Err` item so the caller can log a
//! warning and keep going; the walk itself never aborts.
//!
//! # Example
//!
//! ```no_run
//! use dupefinder::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{FileEntry, ScanError, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root directory.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Walk the tree, yielding a [`FileEntry`] or [`ScanError`] per entry.
    ///
    /// Regular files only; directories and (unfollowed) symlinks are
    /// traversal structure, not candidates. Entries are yielded in
    /// walkdir's deterministic depth-first order.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let skip_hidden = self.config.skip_hidden;
        let min_size = self.config.min_size;
        let max_size = self.config.max_size;

        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .into_iter()
            .filter_entry(move |entry| !skip_hidden || entry.depth() == 0 || !is_hidden(entry))
            .filter_map(move |entry| match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        return None;
                    }
                    match entry.metadata() {
                        Ok(metadata) => {
                            let size = metadata.len();
                            if min_size.is_some_and(|min| size < min)
                                || max_size.is_some_and(|max| size > max)
                            {
                                log::trace!(
                                    "Size filter excluded {} ({} bytes)",
                                    entry.path().display(),
                                    size
                                );
                                return None;
                            }
                            Some(Ok(FileEntry::new(entry.into_path(), size)))
                        }
                        Err(e) => Some(Err(size_query_error(entry.path(), e))),
                    }
                }
                Err(e) => Some(Err(walk_error(e))),
            })
    }
}

/// A file or directory name starting with `.` counts as hidden.
fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Convert a metadata failure into the size-query error variant.
fn size_query_error(path: &Path, err: walkdir::Error) -> ScanError {
    ScanError::SizeQuery {
        path: path.to_path_buf(),
        source: err
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
    }
}

/// Convert a traversal failure into a classified scan error.
fn walk_error(err: walkdir::Error) -> ScanError {
    let path = err
        .path()
        .map_or_else(PathBuf::new, std::path::Path::to_path_buf);
    match err.io_error().map(std::io::Error::kind) {
        Some(std::io::ErrorKind::NotFound) => ScanError::NotFound(path),
        Some(std::io::ErrorKind::PermissionDenied) => ScanError::PermissionDenied(path),
        _ => ScanError::Io {
            path,
            source: err
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
        },
    }
}
