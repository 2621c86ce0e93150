//! Bounded top-N tracking of the largest directories
//!
//! `TopDirs` keeps only the `limit` largest directory records seen so far.
//! Records are ordered by size (largest first) and then by path, so equal
//! sizes always rank the same way from one run to the next.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::size::{Precision, format_size};

/// Default number of directories to keep.
pub const DEFAULT_LIMIT: usize = 30;

/// One fully scanned directory and its total size in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryRecord {
    path: String,
    size: u64,
}

impl DirectoryRecord {
    pub fn new(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    /// Display path, relative to the scan root for descendants.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Total size of regular files under this directory, recursively.
    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Largest first; equal sizes fall back to ascending path.
impl Ord for DirectoryRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .size
            .cmp(&self.size)
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl PartialOrd for DirectoryRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DirectoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_size(self.size, Precision::Report), self.path)
    }
}

/// Thread-safe bounded set of the largest directories.
///
/// `consider` and `snapshot` are serialized by one lock, so a snapshot taken
/// from an interrupt path never observes a half-applied insertion.
#[derive(Debug)]
pub struct TopDirs {
    limit: usize,
    ranked: Mutex<BTreeSet<DirectoryRecord>>,
}

impl TopDirs {
    /// Create an empty tracker keeping at most `limit` records.
    pub fn new(limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(Error::InvalidLimit(limit));
        }
        Ok(Self {
            limit,
            ranked: Mutex::new(BTreeSet::new()),
        })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Offer a record; it is kept only if it ranks among the `limit` largest.
    ///
    /// When the set overflows, the lowest ranked record is evicted, which may
    /// be the one just offered.
    pub fn consider(&self, record: DirectoryRecord) {
        let mut ranked = self.ranked.lock();

        if ranked.len() >= self.limit && ranked.last().is_some_and(|tail| record >= *tail) {
            return;
        }

        ranked.insert(record);
        if ranked.len() > self.limit {
            ranked.pop_last();
        }
    }

    /// Copy of the current ranking, largest first.
    pub fn snapshot(&self) -> Vec<DirectoryRecord> {
        self.ranked.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ranked.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.lock().is_empty()
    }
}
