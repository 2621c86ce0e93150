//! Walker - computes per-directory totals in post-order

use std::fs::DirEntry;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::tracker::{DirectoryRecord, TopDirs};

use super::progress::ProgressState;
use super::utils::{EntryKind, classify_entry, display_path, read_sorted_entries};

/// A directory whose children are still being visited.
struct Frame {
    display: String,
    entries: std::vec::IntoIter<DirEntry>,
    size: u64,
}

/// Depth-first walker that feeds finished directories into a [`TopDirs`].
///
/// Traversal uses an explicit stack rather than recursion, so tree depth is
/// bounded by memory instead of the thread's stack.
pub struct Walker {
    tracker: Arc<TopDirs>,
    progress: Arc<ProgressState>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Walker {
    pub fn new(tracker: Arc<TopDirs>, progress: Arc<ProgressState>) -> Self {
        Self {
            tracker,
            progress,
            cancel: None,
        }
    }

    /// Stop descending as soon as `flag` becomes true.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Walk `root` and return its total size.
    ///
    /// Each directory is offered to the tracker once all of its children have
    /// been counted. If the walk is cancelled, the partial total is returned
    /// and unfinished directories are not recorded.
    pub fn scan(&self, root: &Path) -> u64 {
        let mut stack = vec![self.enter(root, root)];

        while let Some(frame) = stack.last_mut() {
            if self.is_cancelled() {
                debug!("scan cancelled with {} directories open", stack.len());
                return stack.iter().map(|f| f.size).sum();
            }

            match frame.entries.next() {
                Some(entry) => match classify_entry(&entry) {
                    EntryKind::File(len) => {
                        frame.size += len;
                        self.progress.add_bytes(len);
                    }
                    EntryKind::Dir => {
                        let child = self.enter(root, &entry.path());
                        stack.push(child);
                    }
                    EntryKind::Skip => {}
                },
                None => {
                    let size = frame.size;
                    let display = std::mem::take(&mut frame.display);
                    stack.pop();
                    self.tracker.consider(DirectoryRecord::new(display, size));

                    match stack.last_mut() {
                        Some(parent) => parent.size += size,
                        None => return size,
                    }
                }
            }
        }

        0
    }

    fn enter(&self, root: &Path, dir: &Path) -> Frame {
        self.progress.add_dir();
        let display = display_path(root, dir);
        self.progress.set_current_path(&display);

        Frame {
            display,
            entries: read_sorted_entries(dir).into_iter(),
            size: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write_bytes(path: &Path, n: usize) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, vec![b'x'; n]).unwrap();
    }

    fn scan_with_limit(
        root: &Path,
        limit: usize,
    ) -> (u64, Vec<DirectoryRecord>, Arc<ProgressState>) {
        let tracker = Arc::new(TopDirs::new(limit).unwrap());
        let progress = Arc::new(ProgressState::new());
        let walker = Walker::new(Arc::clone(&tracker), Arc::clone(&progress));
        let total = walker.scan(root);
        (total, tracker.snapshot(), progress)
    }

    #[test]
    fn test_flat_directory_totals_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("file1"), "abc1").unwrap();
        fs::write(tmp.path().join("file2"), "abcdef").unwrap();
        fs::write(tmp.path().join("file3"), "abcghi").unwrap();
        fs::write(tmp.path().join("file4"), "abcxyz").unwrap();

        let (total, snapshot, _) = scan_with_limit(tmp.path(), 30);
        assert_eq!(total, 22);
        assert_eq!(
            snapshot,
            vec![DirectoryRecord::new(tmp.path().to_string_lossy(), 22)]
        );
    }

    #[test]
    fn test_root_dominates_with_limit_one() {
        let tmp = TempDir::new().unwrap();
        write_bytes(&tmp.path().join("A/data"), 10);
        write_bytes(&tmp.path().join("B/data"), 20);

        let (total, snapshot, _) = scan_with_limit(tmp.path(), 1);
        assert_eq!(total, 30);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].size(), 30);
        assert_eq!(snapshot[0].path(), tmp.path().to_string_lossy());
    }

    #[test]
    fn test_limit_two_keeps_two_largest() {
        let tmp = TempDir::new().unwrap();
        // Directory sizes: root 15, outer 10, outer/inner 5.
        write_bytes(&tmp.path().join("top"), 5);
        write_bytes(&tmp.path().join("outer/own"), 5);
        write_bytes(&tmp.path().join("outer/inner/leaf"), 5);

        let (_, snapshot, _) = scan_with_limit(tmp.path(), 2);
        let sizes: Vec<_> = snapshot.iter().map(DirectoryRecord::size).collect();
        assert_eq!(sizes, vec![15, 10]);
        assert_eq!(snapshot[1].path(), "outer");
    }

    #[test]
    fn test_nested_sizes_roll_up() {
        let tmp = TempDir::new().unwrap();
        write_bytes(&tmp.path().join("a/b/c/deep"), 7);
        write_bytes(&tmp.path().join("a/shallow"), 3);

        let (total, snapshot, progress) = scan_with_limit(tmp.path(), 30);
        assert_eq!(total, 10);
        assert_eq!(snapshot.len(), 4);

        let sep = std::path::MAIN_SEPARATOR;
        let find = |p: String| snapshot.iter().find(|r| r.path() == p).map(|r| r.size());
        assert_eq!(find("a".to_string()), Some(10));
        assert_eq!(find(format!("a{sep}b")), Some(7));
        assert_eq!(find(format!("a{sep}b{sep}c")), Some(7));

        assert_eq!(progress.bytes_scanned(), 10);
        assert_eq!(progress.dirs_visited(), 4);
    }

    #[test]
    fn test_snapshot_matches_full_ranking() {
        let tmp = TempDir::new().unwrap();
        let layout = [
            ("one/f", 100),
            ("two/f", 40),
            ("two/sub/f", 60),
            ("three/f", 1),
            ("three/x/y/f", 250),
            ("four/f", 90),
        ];
        for (path, size) in layout {
            write_bytes(&tmp.path().join(path), size);
        }

        let (_, full, _) = scan_with_limit(tmp.path(), 100);
        let (_, top, _) = scan_with_limit(tmp.path(), 4);

        assert_eq!(top.len(), 4);
        assert_eq!(top, full[..4].to_vec());
        for pair in top.windows(2) {
            assert!(pair[0].size() >= pair[1].size());
        }
        let smallest_kept = top.last().unwrap().size();
        for rec in &full[4..] {
            assert!(rec.size() <= smallest_kept);
        }
    }

    #[test]
    fn test_rescan_is_deterministic() {
        let tmp = TempDir::new().unwrap();
        for name in ["p", "q", "r", "s"] {
            write_bytes(&tmp.path().join(name).join("f"), 8);
        }

        let (_, first, _) = scan_with_limit(tmp.path(), 3);
        let (_, second, _) = scan_with_limit(tmp.path(), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_directories_are_recorded() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("empty")).unwrap();

        let (total, snapshot, _) = scan_with_limit(tmp.path(), 30);
        assert_eq!(total, 0);
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.iter().any(|r| r.path() == "empty" && r.size() == 0));
    }

    #[test]
    fn test_missing_root_is_zero() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("gone");

        let (total, snapshot, _) = scan_with_limit(&missing, 30);
        assert_eq!(total, 0);
        assert_eq!(snapshot, vec![DirectoryRecord::new(missing.to_string_lossy(), 0)]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_is_skipped() {
        let tmp = TempDir::new().unwrap();
        write_bytes(&tmp.path().join("sub/file"), 6);
        std::os::unix::fs::symlink("..", tmp.path().join("sub/parent")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("sub/file"), tmp.path().join("alias")).unwrap();

        let (total, snapshot, _) = scan_with_limit(tmp.path(), 30);
        assert_eq!(total, 6);
        assert_eq!(snapshot.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_with_only_broken_links_is_zero() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("dangling");
        fs::create_dir(&dir).unwrap();
        std::os::unix::fs::symlink("nowhere", dir.join("a")).unwrap();
        std::os::unix::fs::symlink("nowhere-else", dir.join("b")).unwrap();

        let (_, snapshot, _) = scan_with_limit(tmp.path(), 30);
        assert!(snapshot.iter().any(|r| r.path() == "dangling" && r.size() == 0));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_contributes_zero() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let locked = tmp.path().join("locked");
        write_bytes(&locked.join("secret"), 50);
        write_bytes(&tmp.path().join("open"), 5);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still read it; nothing to check then.
        let readable = fs::read_dir(&locked).is_ok();
        let (total, snapshot, _) = scan_with_limit(tmp.path(), 30);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if readable {
            return;
        }
        assert_eq!(total, 5);
        assert!(snapshot.iter().any(|r| r.path() == "locked" && r.size() == 0));
    }

    #[test]
    fn test_cancelled_walk_records_nothing_unfinished() {
        let tmp = TempDir::new().unwrap();
        write_bytes(&tmp.path().join("a/f"), 10);

        let tracker = Arc::new(TopDirs::new(30).unwrap());
        let progress = Arc::new(ProgressState::new());
        let flag = Arc::new(AtomicBool::new(true));
        let walker = Walker::new(Arc::clone(&tracker), progress).with_cancel_flag(flag);

        assert!(walker.is_cancelled());
        assert_eq!(walker.scan(tmp.path()), 0);
        assert!(tracker.is_empty());
    }
}
