//! Directory scanning
//!
//! The walker runs on its own thread so the caller can wait for either the
//! walk to finish or an interrupt, and still read the tracker at any moment.
//!
//! - `config` - Scan configuration
//! - `progress` - Counters shared with the progress reporter
//! - `walker` - Post-order size aggregation
//! - `utils` - Entry classification and display paths

mod config;
mod progress;
mod utils;
mod walker;

pub use config::ScanConfig;
pub use progress::{ProgressSnapshot, ProgressState};
pub use utils::{display_path, resolve_root};
pub use walker::Walker;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::Receiver;
use tracing::info;

use crate::error::{Error, Result};
use crate::tracker::TopDirs;

/// Handle to a scan running on a background thread.
pub struct ScanHandle {
    tracker: Arc<TopDirs>,
    cancel_flag: Arc<AtomicBool>,
    done_rx: Receiver<u64>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Ask the walker to stop at the next entry.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    pub fn tracker(&self) -> &Arc<TopDirs> {
        &self.tracker
    }

    /// Receives the root's total size once the walk returns.
    pub fn done(&self) -> &Receiver<u64> {
        &self.done_rx
    }

    /// Block until the walk returns and yield the root's total size.
    pub fn wait(mut self) -> u64 {
        let total = self.done_rx.recv().unwrap_or(0);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        total
    }
}

/// Start walking `root` on a new thread.
///
/// `progress` is shared so that a reporter can be started on it before the
/// walk begins.
pub fn start_scan(
    root: PathBuf,
    config: &ScanConfig,
    progress: Arc<ProgressState>,
) -> Result<ScanHandle> {
    let tracker = Arc::new(TopDirs::new(config.limit)?);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let (done_tx, done_rx) = crossbeam_channel::bounded(1);

    let walker = Walker::new(Arc::clone(&tracker), progress)
        .with_cancel_flag(Arc::clone(&cancel_flag));

    let thread = thread::Builder::new()
        .name("bigdirs-walker".into())
        .spawn(move || {
            info!("scanning {}", root.display());
            let total = walker.scan(&root);
            info!(
                "scan of {} finished: {} bytes{}",
                root.display(),
                total,
                if walker.is_cancelled() { " (cancelled)" } else { "" }
            );
            let _ = done_tx.send(total);
        })
        .map_err(|source| Error::Spawn {
            name: "walker",
            source,
        })?;

    Ok(ScanHandle {
        tracker,
        cancel_flag,
        done_rx,
        thread: Some(thread),
    })
}
