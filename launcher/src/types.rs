//! Error types for the launcher

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the launcher crate
pub type LauncherResult<T> = Result<T, LauncherError>;

#[derive(Error, Debug)]
pub enum LauncherError {
    /// The runtime environment directory (or its bin/ subdirectory) is
    /// missing. Raised before any process is spawned.
    #[error("runtime environment not found at {0} (expected a bin/ subdirectory)")]
    MissingRuntime(PathBuf),

    /// The wrapper executable could not be resolved next to the launcher
    /// or on PATH, or was not executable.
    #[error("wrapper executable not found: {0}")]
    MissingWrapper(PathBuf),

    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
