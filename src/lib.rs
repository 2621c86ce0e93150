//! bigdirs - find the largest directories under a path, with live progress

pub mod error;
pub mod output;
pub mod reporter;
pub mod scan;
pub mod size;
pub mod tracker;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use error::{Error, Result};
pub use output::{OutputConfig, Report, print_json, print_report};
pub use reporter::{Reporter, ReporterConfig};
pub use scan::{ProgressState, ScanConfig, ScanHandle, Walker, resolve_root, start_scan};
pub use size::{Precision, format_size};
pub use tracker::{DEFAULT_LIMIT, DirectoryRecord, TopDirs};
