//! Error and Result types for Scribe log writer operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A convenience `Result` type for Scribe operations.
pub type Result<T> = std::result::Result<T, ScribeError>;

/// The error type for log writer setup and maintenance.
///
/// Record writes never return this type: failures on the write path are
/// suppressed and counted in [`WriterStats`](crate::WriterStats).
#[derive(Debug, Error)]
pub enum ScribeError {
    /// Underlying I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// The parent directory of the log file could not be created.
    #[error("Failed to create log directory at {}: {source}", path.display())]
    CreateDirectory {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The log path has no file name component.
    #[error("Invalid log path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// A severity name could not be parsed.
    #[error("Unknown log level: {0:?}")]
    ParseLevel(String),
}
