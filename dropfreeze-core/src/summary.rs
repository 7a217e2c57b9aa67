//! Summary statistics for a loaded assay.

use crate::{AssayModel, FrameId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Overview of an assay, for reporting before or after annotation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AssaySummary {
    /// Number of frames.
    pub frame_count: usize,
    /// First and last frame id.
    pub frame_range: (FrameId, FrameId),
    /// Frames whose image file is missing.
    pub missing_images: Vec<FrameId>,
    /// Earliest and latest logged time.
    pub time_range: (f64, f64),
    /// Warmest and coldest thermocouple reading.
    pub thermocouple_range: (f64, f64),
    /// Freezes counted so far.
    pub total_freezes: usize,
}

impl AssaySummary {
    /// Summarizes an assay.
    #[must_use]
    pub fn from_assay(assay: &AssayModel) -> Self {
        let mut missing_images = Vec::new();
        let mut time_range = (f64::INFINITY, f64::NEG_INFINITY);
        let mut thermocouple_range = (f64::NEG_INFINITY, f64::INFINITY);

        for frame in assay.iter() {
            if frame.image.is_missing() {
                missing_images.push(frame.id);
            }
            time_range.0 = time_range.0.min(frame.sensor.time);
            time_range.1 = time_range.1.max(frame.sensor.time);
            thermocouple_range.0 = thermocouple_range.0.max(frame.sensor.thermocouple_temp);
            thermocouple_range.1 = thermocouple_range.1.min(frame.sensor.thermocouple_temp);
        }

        let ids = assay.frames();
        let frame_range = match (ids.first(), ids.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => (FrameId::default(), FrameId::default()),
        };

        Self {
            frame_count: assay.len(),
            frame_range,
            missing_images,
            time_range,
            thermocouple_range,
            total_freezes: assay.total_freezes(),
        }
    }
}
