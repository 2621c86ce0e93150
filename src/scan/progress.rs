//! Live scan counters shared between the walker and the reporter

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Running totals updated by the walker and polled by the reporter.
///
/// Counters only ever grow. Reads are relaxed: the reporter is happy with
/// any recent value.
#[derive(Debug, Default)]
pub struct ProgressState {
    bytes_scanned: AtomicU64,
    dirs_visited: AtomicU64,
    current_path: Mutex<String>,
}

/// Point-in-time copy of [`ProgressState`] for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub bytes_scanned: u64,
    pub dirs_visited: u64,
    pub current_path: String,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bytes(&self, bytes: u64) {
        self.bytes_scanned.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn add_dir(&self) {
        self.dirs_visited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_current_path(&self, path: &str) {
        let mut current = self.current_path.lock();
        current.clear();
        current.push_str(path);
    }

    pub fn bytes_scanned(&self) -> u64 {
        self.bytes_scanned.load(Ordering::Relaxed)
    }

    pub fn dirs_visited(&self) -> u64 {
        self.dirs_visited.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            bytes_scanned: self.bytes_scanned(),
            dirs_visited: self.dirs_visited(),
            current_path: self.current_path.lock().clone(),
        }
    }
}
