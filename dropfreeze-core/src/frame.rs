//! Frame identity, sensor readings and image references.

use crate::PixelPoint;
use std::fmt;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a photographed frame.
///
/// Matches the `frame_id` column of the assay log and the stem of the
/// frame's image file. Ids are chronological but need not be contiguous
/// or zero-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameId(pub i64);

impl FrameId {
    /// Creates a new frame id.
    #[inline]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[inline]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sensor readings logged alongside a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorReading {
    /// Elapsed time when the frame was taken.
    pub time: f64,
    /// Cold-stage setpoint temperature (°C).
    pub setpoint_temp: f64,
    /// Thermocouple temperature (°C). This is the temperature reported
    /// in the fraction-frozen table.
    pub thermocouple_temp: f64,
    /// Platinum resistance probe temperature (°C).
    pub probe_temp: f64,
}

impl SensorReading {
    /// Creates a new sensor reading.
    pub fn new(time: f64, setpoint_temp: f64, thermocouple_temp: f64, probe_temp: f64) -> Self {
        Self {
            time,
            setpoint_temp,
            thermocouple_temp,
            probe_temp,
        }
    }
}

/// Location of a frame's photograph.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ImageRef {
    /// The image file exists at this path.
    Present(PathBuf),
    /// No image file was found. The frame stays navigable and annotatable;
    /// the presentation layer shows a blank placeholder instead.
    Missing,
}

impl ImageRef {
    /// Returns the image path, if the image exists.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ImageRef::Present(path) => Some(path),
            ImageRef::Missing => None,
        }
    }

    /// Returns true if no image file backs this frame.
    pub fn is_missing(&self) -> bool {
        matches!(self, ImageRef::Missing)
    }
}

/// One photographed frame with its sensor data and freezing marks.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    /// Frame identity.
    pub id: FrameId,
    /// Sensor readings logged for this frame.
    pub sensor: SensorReading,
    /// Image backing this frame.
    pub image: ImageRef,
    events: Vec<PixelPoint>,
    tally: u32,
}

impl Frame {
    /// Creates a frame with no events and a zero tally.
    pub fn new(id: FrameId, sensor: SensorReading, image: ImageRef) -> Self {
        Self {
            id,
            sensor,
            image,
            events: Vec::new(),
            tally: 0,
        }
    }

    /// Freezing events marked on this frame.
    pub fn events(&self) -> &[PixelPoint] {
        &self.events
    }

    /// Manual freeze tally for this frame.
    pub fn tally(&self) -> u32 {
        self.tally
    }

    pub(crate) fn events_mut(&mut self) -> &mut Vec<PixelPoint> {
        &mut self.events
    }

    pub(crate) fn tally_mut(&mut self) -> &mut u32 {
        &mut self.tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_id_ordering() {
        let mut ids = vec![FrameId::new(10), FrameId::new(-2), FrameId::new(3)];
        ids.sort();
        assert_eq!(ids, vec![FrameId(-2), FrameId(3), FrameId(10)]);
        assert_eq!(FrameId::new(7).to_string(), "7");
    }

    #[test]
    fn test_image_ref() {
        let present = ImageRef::Present(PathBuf::from("assay/4.jpg"));
        assert_eq!(present.path(), Some(Path::new("assay/4.jpg")));
        assert!(!present.is_missing());

        assert!(ImageRef::Missing.is_missing());
        assert_eq!(ImageRef::Missing.path(), None);
    }

    #[test]
    fn test_new_frame_is_unmarked() {
        let frame = Frame::new(
            FrameId::new(1),
            SensorReading::new(0.0, -5.0, -4.8, -4.9),
            ImageRef::Missing,
        );
        assert!(frame.events().is_empty());
        assert_eq!(frame.tally(), 0);
    }
}
