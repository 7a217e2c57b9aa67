//! I/O error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-text reader or writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The assay directory has no log file.
    #[error("assay not found: no log file at {}", .0.display())]
    AssayNotFound(PathBuf),

    /// A log row could not be parsed.
    #[error("invalid log format at line {line}: {message}")]
    InvalidFormat { line: u64, message: String },

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] dropfreeze_core::Error),
}
