//! Error types for dropfreeze-core.

use crate::FrameId;
use thiserror::Error;

/// Result type alias for dropfreeze operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for dropfreeze operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A frame id that is not part of the loaded assay.
    #[error("unknown frame id: {0}")]
    UnknownFrame(FrameId),

    /// The assay log produced no frames to annotate.
    #[error("assay contains no frames")]
    EmptyAssay,

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}
