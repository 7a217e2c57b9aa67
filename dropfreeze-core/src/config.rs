//! Annotation configuration.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default half-width of the exclusion box around an event, in pixels.
///
/// Matches the 30 px diameter of the on-screen freeze marker.
pub const DEFAULT_EXCLUSION_RADIUS: f64 = 15.0;

/// How freezes are counted per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnnotationMode {
    /// Each clicked droplet location is one freeze.
    #[default]
    Events,
    /// The operator keeps a per-frame counter; clicks are visual notes only.
    Tally,
}

impl AnnotationMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationMode::Events => "events",
            AnnotationMode::Tally => "tally",
        }
    }
}

/// Configuration for an annotation session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnnotationConfig {
    /// Half-width of the square exclusion box used to match clicks
    /// against existing events (pixels).
    pub exclusion_radius: f64,
    /// Counting mode.
    pub mode: AnnotationMode,
    /// Number of droplets in the assay. When set, fractions are divided
    /// by this instead of the number of counted freezes.
    pub droplet_count: Option<u32>,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            exclusion_radius: DEFAULT_EXCLUSION_RADIUS,
            mode: AnnotationMode::Events,
            droplet_count: None,
        }
    }
}

impl AnnotationConfig {
    /// Creates a new annotation configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the exclusion box half-width.
    pub fn with_exclusion_radius(mut self, radius: f64) -> Self {
        self.exclusion_radius = radius;
        self
    }

    /// Sets the counting mode.
    pub fn with_mode(mut self, mode: AnnotationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the known number of droplets.
    pub fn with_droplet_count(mut self, count: u32) -> Self {
        self.droplet_count = Some(count);
        self
    }

    /// Checks that the configuration can drive a session.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` for a non-finite or non-positive radius
    /// or a droplet count of zero.
    pub fn validate(&self) -> Result<()> {
        if !self.exclusion_radius.is_finite() || self.exclusion_radius <= 0.0 {
            return Err(Error::ConfigError(format!(
                "exclusion radius must be a positive number of pixels, got {}",
                self.exclusion_radius
            )));
        }
        if self.droplet_count == Some(0) {
            return Err(Error::ConfigError(
                "droplet count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
