//! Test utilities for building temporary directory trees.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory tree for testing.
///
/// The tree is automatically cleaned up when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file of exactly `size` bytes.
    ///
    /// Creates parent directories as needed.
    pub fn add_file(&self, path: &str, size: usize) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, vec![b'.'; size]).expect("Failed to write file");
        full_path
    }

    /// Build a wide, moderately deep tree: `breadth` directories per level,
    /// `depth` levels, one file of `file_size` bytes in each directory.
    pub fn populate(&self, breadth: usize, depth: usize, file_size: usize) {
        fn fill(tree: &TestTree, prefix: &str, breadth: usize, depth: usize, file_size: usize) {
            if depth == 0 {
                return;
            }
            for i in 0..breadth {
                let dir = if prefix.is_empty() {
                    format!("d{i}")
                } else {
                    format!("{prefix}/d{i}")
                };
                tree.add_file(&format!("{dir}/data.bin"), file_size);
                fill(tree, &dir, breadth, depth - 1, file_size);
            }
        }
        fill(self, "", breadth, depth, file_size);
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}
