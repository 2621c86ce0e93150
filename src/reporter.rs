//! Live progress line on stderr
//!
//! The reporter redraws a single status line every `interval` from the
//! shared [`ProgressState`], overwriting it in place with a carriage return.
//! Stopping it prints one last line ending in a newline so the summary stays
//! in the scrollback. Output errors are ignored: progress is cosmetic and
//! must never fail a scan.

use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::scan::{ProgressSnapshot, ProgressState};
use crate::size::{Precision, format_size};

/// Timing and layout of the progress line.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Time between redraws.
    pub interval: Duration,
    /// Longest current path shown before it is cut and marked with `...`.
    pub path_width: usize,
    /// Lines shorter than this are padded with spaces so they fully cover
    /// whatever was drawn before.
    pub line_width: usize,
    /// How long `stop` waits for the drawing thread to exit.
    pub stop_timeout: Duration,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            path_width: 30,
            line_width: 78,
            stop_timeout: Duration::from_millis(500),
        }
    }
}

/// Render one progress line, without the trailing `\r` or `\n`.
///
/// The final line leaves out the current path.
pub fn render_line(snapshot: &ProgressSnapshot, is_final: bool, config: &ReporterConfig) -> String {
    let mut msg = format!(
        "Scanned: {} dirs: {}",
        format_size(snapshot.bytes_scanned, Precision::Progress),
        snapshot.dirs_visited
    );

    if !is_final {
        msg.push(' ');
        msg.push_str(&truncate_path(&snapshot.current_path, config.path_width));
    }

    let len = msg.chars().count();
    if len < config.line_width {
        msg.extend(std::iter::repeat_n(' ', config.line_width - len));
    }
    msg
}

fn truncate_path(path: &str, width: usize) -> String {
    if path.chars().count() > width {
        let mut short: String = path.chars().take(width).collect();
        short.push_str("...");
        short
    } else {
        path.to_string()
    }
}

enum State {
    Idle,
    Running {
        stop_tx: Sender<()>,
        exited_rx: Receiver<()>,
        thread: thread::JoinHandle<()>,
    },
    Stopped,
}

/// Background progress reporter: `Idle -> Running -> Stopped`.
pub struct Reporter<W: Write + Send + 'static> {
    config: ReporterConfig,
    progress: Arc<ProgressState>,
    out: Arc<Mutex<W>>,
    state: State,
}

impl Reporter<io::Stderr> {
    /// Reporter drawing on the process's stderr.
    pub fn stderr(progress: Arc<ProgressState>, config: ReporterConfig) -> Self {
        Self::new(progress, config, io::stderr())
    }
}

impl<W: Write + Send + 'static> Reporter<W> {
    pub fn new(progress: Arc<ProgressState>, config: ReporterConfig, out: W) -> Self {
        Self {
            config,
            progress,
            out: Arc::new(Mutex::new(out)),
            state: State::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running { .. })
    }

    /// Begin redrawing. Does nothing unless the reporter is idle.
    pub fn start(&mut self) {
        if !matches!(self.state, State::Idle) {
            debug!("reporter already started");
            return;
        }

        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let (exited_tx, exited_rx) = crossbeam_channel::bounded::<()>(1);
        let progress = Arc::clone(&self.progress);
        let out = Arc::clone(&self.out);
        let config = self.config.clone();

        let spawned = thread::Builder::new()
            .name("bigdirs-reporter".into())
            .spawn(move || {
                loop {
                    let line = render_line(&progress.snapshot(), false, &config);
                    write_line(&*out, &line, false);
                    match stop_rx.recv_timeout(config.interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        _ => break,
                    }
                }
                drop(exited_tx);
            });

        match spawned {
            Ok(thread) => {
                self.state = State::Running {
                    stop_tx,
                    exited_rx,
                    thread,
                }
            }
            Err(err) => warn!("progress reporter unavailable: {}", err),
        }
    }

    /// Halt redrawing and print the final summary line.
    ///
    /// Waits at most `stop_timeout` for an in-flight redraw. Calling it again
    /// after the reporter has stopped does nothing.
    pub fn stop(&mut self) {
        match std::mem::replace(&mut self.state, State::Stopped) {
            State::Stopped => return,
            State::Idle => {}
            State::Running {
                stop_tx,
                exited_rx,
                thread,
            } => {
                let _ = stop_tx.send(());
                match exited_rx.recv_timeout(self.config.stop_timeout) {
                    Err(RecvTimeoutError::Timeout) => {
                        debug!("reporter thread did not exit in time, detaching");
                    }
                    _ => {
                        let _ = thread.join();
                    }
                }
            }
        }

        let line = render_line(&self.progress.snapshot(), true, &self.config);
        write_line(&*self.out, &line, true);
    }
}

impl<W: Write + Send + 'static> Drop for Reporter<W> {
    fn drop(&mut self) {
        if self.is_running() {
            self.stop();
        }
    }
}

fn write_line<W: Write>(out: &Mutex<W>, line: &str, is_final: bool) {
    let mut out = out.lock();
    let end = if is_final { "\n" } else { "\r" };
    let _ = write!(out, "{}{}", line, end);
    let _ = out.flush();
}
