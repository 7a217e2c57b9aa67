//! dropfreeze-io: Assay loading and table output for dropfreeze.
//!
//! This crate reads the sensor log of an assay directory, resolves each
//! frame's image file and writes the finished fraction-frozen table.
//!

pub mod assay_dir;
mod error;
pub mod log_file;
mod writer;

pub use assay_dir::{
    build_assay, load_assay, AssayLayout, DEFAULT_IMAGE_EXTENSION, DEFAULT_LOG_FILE,
};
pub use error::{Error, Result};
pub use log_file::{parse_log, read_log, LogRecord, LOG_COLUMNS};
pub use writer::{FractionFrozenWriter, TableFile, DEFAULT_OUTPUT_FILE};
