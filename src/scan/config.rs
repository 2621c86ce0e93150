//! Configuration for a scan

use crate::tracker::DEFAULT_LIMIT;

/// Configuration for one scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// How many of the largest directories to keep.
    pub limit: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}
