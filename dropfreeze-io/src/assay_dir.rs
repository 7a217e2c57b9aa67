//! Loading an assay directory into an [`AssayModel`].
//!
//! An assay directory holds the sensor log and one image per frame, named
//! after the frame id (`<id>.<ext>`). Missing images are tolerated; a
//! missing log is fatal.

use crate::log_file::{read_log, LogRecord};
use crate::{Error, Result};
use dropfreeze_core::{AnnotationConfig, AssayModel, Frame, FrameId, ImageRef};
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Log file name looked up inside the assay directory by default.
pub const DEFAULT_LOG_FILE: &str = "log_data.csv";

/// Image file extension used by default.
pub const DEFAULT_IMAGE_EXTENSION: &str = "jpg";

/// Where the log and images of an assay live.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AssayLayout {
    /// Explicit log file. `None` means `DEFAULT_LOG_FILE` inside the
    /// assay directory.
    pub log_file: Option<PathBuf>,
    /// Image file extension, without the leading dot.
    pub image_extension: String,
}

impl Default for AssayLayout {
    fn default() -> Self {
        Self {
            log_file: None,
            image_extension: DEFAULT_IMAGE_EXTENSION.to_string(),
        }
    }
}

impl AssayLayout {
    /// Creates a layout with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an explicit log file instead of the default name.
    pub fn with_log_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Sets the image extension. A leading dot is stripped.
    pub fn with_image_extension(mut self, extension: &str) -> Self {
        self.image_extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Path of the log file for an assay directory.
    pub fn log_path(&self, dir: &Path) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| dir.join(DEFAULT_LOG_FILE))
    }

    /// Path where the image of a frame is expected.
    pub fn image_path(&self, dir: &Path, id: FrameId) -> PathBuf {
        dir.join(format!("{id}.{}", self.image_extension))
    }

    /// Resolves a frame's image, flagging it missing if the file is absent.
    pub fn resolve_image(&self, dir: &Path, id: FrameId) -> ImageRef {
        let path = self.image_path(dir, id);
        if path.is_file() {
            ImageRef::Present(path)
        } else {
            log::warn!("image file missing for frame #{id}: {}", path.display());
            ImageRef::Missing
        }
    }
}

/// Loads an assay directory.
///
/// # Errors
/// Returns `Error::AssayNotFound` if the log file does not exist,
/// `Error::InvalidFormat` if the log is malformed, and a core error if the
/// log holds no frames or the configuration is invalid.
pub fn load_assay(dir: &Path, layout: &AssayLayout, config: AnnotationConfig) -> Result<AssayModel> {
    let log_path = layout.log_path(dir);
    if !log_path.is_file() {
        return Err(Error::AssayNotFound(log_path));
    }

    let records = read_log(&log_path)?;
    let assay = build_assay(dir, layout, &records, config)?;

    let missing = assay.iter().filter(|f| f.image.is_missing()).count();
    log::info!(
        "loaded assay {}: {} frames, {} without images",
        dir.display(),
        assay.len(),
        missing
    );
    Ok(assay)
}

/// Builds the model from already-parsed log rows.
///
/// # Errors
/// Returns a core error if `records` is empty or the configuration is
/// invalid.
pub fn build_assay(
    dir: &Path,
    layout: &AssayLayout,
    records: &[LogRecord],
    config: AnnotationConfig,
) -> Result<AssayModel> {
    let frames = records.iter().map(|record| {
        Frame::new(
            record.frame_id,
            record.sensor(),
            layout.resolve_image(dir, record.frame_id),
        )
    });
    Ok(AssayModel::new(frames, config)?)
}
