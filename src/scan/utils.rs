//! Path and directory-entry helpers for the walker

use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Error, Result};

/// What the walker should do with one directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file of the given length.
    File(u64),
    /// Directory to descend into.
    Dir,
    /// Symlink, special file, or something we could not stat.
    Skip,
}

/// Classify an entry without following symlinks.
///
/// Symlinks are never counted or descended, which is also what keeps a link
/// back to an ancestor from looping forever.
pub fn classify_entry(entry: &DirEntry) -> EntryKind {
    let meta = match entry.metadata() {
        Ok(m) => m,
        Err(err) => {
            debug!("skipping {}: {}", entry.path().display(), err);
            return EntryKind::Skip;
        }
    };

    let file_type = meta.file_type();
    if file_type.is_symlink() {
        trace!("skipping symlink {}", entry.path().display());
        EntryKind::Skip
    } else if file_type.is_file() {
        EntryKind::File(meta.len())
    } else if file_type.is_dir() {
        EntryKind::Dir
    } else {
        EntryKind::Skip
    }
}

/// List a directory's children in file-name order.
///
/// Any failure (permission denied, not a directory, vanished mid-scan) reads
/// as an empty directory.
pub fn read_sorted_entries(path: &Path) -> Vec<DirEntry> {
    let entries = match fs::read_dir(path) {
        Ok(e) => e,
        Err(err) => {
            debug!("cannot list {}: {}", path.display(), err);
            return Vec::new();
        }
    };

    let mut entries: Vec<_> = entries.filter_map(|e| e.ok()).collect();
    entries.sort_by_key(|a| a.file_name());
    entries
}

/// Display path for `dir`: relative to `root` when strictly inside it,
/// otherwise the path as given.
pub fn display_path(root: &Path, dir: &Path) -> String {
    match dir.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_string_lossy().into_owned(),
        _ => dir.to_string_lossy().into_owned(),
    }
}

/// Check that `path` is a readable directory and return its canonical form,
/// or its absolute form when canonicalization fails.
pub fn resolve_root(path: &Path) -> Result<PathBuf> {
    let meta = fs::metadata(path).map_err(|source| Error::RootNotAccessible {
        path: path.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(Error::NotADirectory(path.to_path_buf()));
    }

    Ok(fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf()))
}
