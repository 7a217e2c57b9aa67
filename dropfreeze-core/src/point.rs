//! Pixel coordinates of freezing events.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position of a click or event in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PixelPoint {
    /// X coordinate (column).
    pub x: f64,
    /// Y coordinate (row).
    pub y: f64,
}

impl PixelPoint {
    /// Creates a new pixel point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Checks whether `other` lies inside the square exclusion box of the
    /// given half-width centred on this point.
    ///
    /// Both axes are tested independently against an open interval, so a
    /// point exactly `half_width` away on either axis is outside.
    #[inline]
    pub fn within_box(&self, other: &Self, half_width: f64) -> bool {
        (self.x - other.x).abs() < half_width && (self.y - other.y).abs() < half_width
    }
}

impl From<(f64, f64)> for PixelPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}
