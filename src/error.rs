//! Error type for bigdirs

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the caller.
///
/// Per-entry filesystem failures during a walk never show up here: an
/// unreadable entry simply contributes zero bytes.
#[derive(Error, Debug)]
pub enum Error {
    #[error("limit must be at least 1, got {0}")]
    InvalidLimit(usize),

    #[error("cannot access '{}': {}", path.display(), source)]
    RootNotAccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("error writing output: {0}")]
    Output(#[from] io::Error),

    #[error("error serializing report: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
