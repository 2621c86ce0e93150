//! CLI entry point for bigdirs

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use bigdirs::{
    DEFAULT_LIMIT, OutputConfig, ProgressState, Report, Reporter, ReporterConfig, ScanConfig,
    print_json, print_report, resolve_root, start_scan,
};
use clap::{Parser, ValueEnum};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Exit status after an interrupted scan, as shells report for SIGINT.
const EXIT_INTERRUPTED: i32 = 130;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "bigdirs")]
#[command(about = "Report the largest directories under a path")]
#[command(version)]
struct Args {
    /// Directory to scan
    path: PathBuf,

    /// Number of directories to report
    #[arg(value_name = "N", default_value_t = DEFAULT_LIMIT, value_parser = parse_limit)]
    limit: usize,

    /// Output in JSON format
    #[arg(long = "json")]
    json: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Do not draw the live progress line on stderr
    #[arg(long = "no-progress")]
    no_progress: bool,
}

/// Parse the directory count; it must be a positive integer.
fn parse_limit(s: &str) -> Result<usize, String> {
    let n: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", s))?;
    if n == 0 {
        return Err("must be at least 1".to_string());
    }
    Ok(n)
}

/// Log to stderr, filtered by `BIGDIRS_LOG` (default: warn).
fn init_logging() {
    let filter = EnvFilter::try_from_env("BIGDIRS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging();

    match run(&args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("bigdirs: {}", e);
            process::exit(1);
        }
    }
}

/// Scan, wait for completion or Ctrl-C, then print whatever was collected.
fn run(args: &Args) -> bigdirs::Result<i32> {
    let root = resolve_root(&args.path)?;
    let output_config = OutputConfig {
        use_color: should_use_color(args.color),
    };

    let (interrupt_tx, interrupt_rx) = crossbeam_channel::bounded::<()>(1);
    let handler_tx = interrupt_tx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = handler_tx.try_send(());
    }) {
        warn!("cannot install interrupt handler: {}", e);
    }

    let progress = Arc::new(ProgressState::new());
    let mut reporter = if args.no_progress {
        None
    } else {
        let mut reporter = Reporter::stderr(Arc::clone(&progress), ReporterConfig::default());
        reporter.start();
        Some(reporter)
    };

    let handle = start_scan(root.clone(), &ScanConfig { limit: args.limit }, progress)?;

    let interrupted = crossbeam_channel::select! {
        recv(handle.done()) -> total => {
            debug!("walk returned {:?} bytes", total.ok());
            false
        }
        recv(interrupt_rx) -> _ => {
            handle.cancel();
            true
        }
    };
    drop(interrupt_tx);

    if let Some(reporter) = reporter.as_mut() {
        reporter.stop();
    }

    let report = Report::from_tracker(root.display().to_string(), handle.tracker(), interrupted);
    if args.json {
        print_json(&report)?;
    } else {
        print_report(&report, &output_config)?;
    }

    Ok(if interrupted { EXIT_INTERRUPTED } else { 0 })
}
