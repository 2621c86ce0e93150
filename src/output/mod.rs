//! Final report formatting
//!
//! - `config` - Output configuration types
//! - `console` - Text report, optionally colored
//! - `json` - JSON report

mod config;
mod console;
mod json;

pub use config::OutputConfig;
pub use console::{print_report, write_report};
pub use json::{print_json, write_json};

use crate::tracker::{DirectoryRecord, TopDirs};

/// Everything printed once the scan ends, whether it finished or not.
#[derive(Debug, Clone)]
pub struct Report {
    /// Root as shown in the header.
    pub root: String,
    pub limit: usize,
    /// True when the scan was cut short and the ranking is partial.
    pub interrupted: bool,
    /// Largest first.
    pub directories: Vec<DirectoryRecord>,
}

impl Report {
    /// Build a report from the tracker's current ranking.
    pub fn from_tracker(root: impl Into<String>, tracker: &TopDirs, interrupted: bool) -> Self {
        Self {
            root: root.into(),
            limit: tracker.limit(),
            interrupted,
            directories: tracker.snapshot(),
        }
    }
}
