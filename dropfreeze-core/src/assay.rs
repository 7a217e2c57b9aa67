//! The in-memory assay: every frame with its sensor data and marks.

use crate::{AnnotationConfig, AnnotationMode, Error, Frame, FrameId, PixelPoint, Result};
use std::collections::BTreeMap;

/// Result of clicking on a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToggleOutcome {
    /// No event was near the click; a new event was added to the frame.
    Marked(PixelPoint),
    /// An event of the same frame was near the click and was removed.
    Unmarked(PixelPoint),
    /// The click falls inside an event held by another frame. Nothing changed.
    AlreadyMarked {
        /// Frame that holds the existing event.
        holder: FrameId,
        /// Position of the existing event.
        at: PixelPoint,
    },
}

/// Result of decrementing a frame's tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TallyOutcome {
    /// The tally changed to this value.
    Changed(u32),
    /// The tally was already zero. Nothing changed.
    AtZero,
}

/// All frames of one assay, keyed by frame id.
///
/// The frame set is fixed at construction; only the events and tallies of
/// individual frames change afterwards.
#[derive(Debug, Clone)]
pub struct AssayModel {
    frames: BTreeMap<FrameId, Frame>,
    order: Vec<FrameId>,
    config: AnnotationConfig,
}

impl AssayModel {
    /// Builds the model from loaded frames.
    ///
    /// If two frames share an id the later one replaces the earlier.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if the configuration is invalid and
    /// `Error::EmptyAssay` if no frames are given.
    pub fn new<I>(frames: I, config: AnnotationConfig) -> Result<Self>
    where
        I: IntoIterator<Item = Frame>,
    {
        config.validate()?;

        let mut by_id = BTreeMap::new();
        for frame in frames {
            if let Some(previous) = by_id.insert(frame.id, frame) {
                log::warn!("frame {} listed more than once, keeping the last row", previous.id);
            }
        }
        if by_id.is_empty() {
            return Err(Error::EmptyAssay);
        }

        let order = by_id.keys().copied().collect();
        Ok(Self {
            frames: by_id,
            order,
            config,
        })
    }

    /// Frame ids in ascending (chronological) order.
    pub fn frames(&self) -> &[FrameId] {
        &self.order
    }

    /// Returns the number of frames.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the assay has no frames.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Looks up a frame.
    pub fn frame(&self, id: FrameId) -> Option<&Frame> {
        self.frames.get(&id)
    }

    /// Iterates over frames in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.values()
    }

    /// Returns the annotation configuration.
    pub fn config(&self) -> &AnnotationConfig {
        &self.config
    }

    /// Events marked on a frame. Empty for frames without events and for
    /// unknown ids.
    pub fn events_in(&self, id: FrameId) -> &[PixelPoint] {
        match self.frames.get(&id) {
            Some(frame) => frame.events(),
            None => &[],
        }
    }

    /// Finds the first event, in frame order, whose exclusion box contains
    /// `point`.
    pub fn find_event(&self, point: PixelPoint) -> Option<(FrameId, usize)> {
        let radius = self.config.exclusion_radius;
        self.frames.values().find_map(|frame| {
            frame
                .events()
                .iter()
                .position(|event| event.within_box(&point, radius))
                .map(|index| (frame.id, index))
        })
    }

    /// Marks or unmarks a freezing event on a frame.
    ///
    /// The frame's own events are checked first and a match there is
    /// removed, even if the click also falls inside another frame's event.
    /// Otherwise a match on any other frame rejects the click, and no match
    /// at all adds the click as a new event on `id`.
    ///
    /// # Errors
    /// Returns `Error::UnknownFrame` if `id` is not part of the assay.
    pub fn toggle_event(&mut self, id: FrameId, point: PixelPoint) -> Result<ToggleOutcome> {
        let radius = self.config.exclusion_radius;
        let own = self
            .frames
            .get(&id)
            .ok_or(Error::UnknownFrame(id))?
            .events()
            .iter()
            .position(|event| event.within_box(&point, radius));

        let outcome = if let Some(index) = own {
            ToggleOutcome::Unmarked(self.frame_mut(id)?.events_mut().remove(index))
        } else if let Some((holder, index)) = self.find_event(point) {
            ToggleOutcome::AlreadyMarked {
                holder,
                at: self.events_in(holder)[index],
            }
        } else {
            self.frame_mut(id)?.events_mut().push(point);
            ToggleOutcome::Marked(point)
        };

        log::debug!("frame {id}: click ({}, {}) -> {outcome:?}", point.x, point.y);
        Ok(outcome)
    }

    /// Adds one to a frame's freeze tally and returns the new value.
    ///
    /// # Errors
    /// Returns `Error::UnknownFrame` if `id` is not part of the assay.
    pub fn increment_tally(&mut self, id: FrameId) -> Result<u32> {
        let tally = self.frame_mut(id)?.tally_mut();
        *tally = tally.saturating_add(1);
        Ok(*tally)
    }

    /// Removes one from a frame's freeze tally, unless it is already zero.
    ///
    /// # Errors
    /// Returns `Error::UnknownFrame` if `id` is not part of the assay.
    pub fn decrement_tally(&mut self, id: FrameId) -> Result<TallyOutcome> {
        let tally = self.frame_mut(id)?.tally_mut();
        if *tally == 0 {
            return Ok(TallyOutcome::AtZero);
        }
        *tally -= 1;
        Ok(TallyOutcome::Changed(*tally))
    }

    /// Number of freezes counted on a frame under the configured mode.
    pub fn freeze_count(&self, id: FrameId) -> usize {
        self.frames
            .get(&id)
            .map_or(0, |frame| Self::count_for(self.config.mode, frame))
    }

    /// Number of freezes counted across all frames.
    pub fn total_freezes(&self) -> usize {
        self.frames
            .values()
            .map(|frame| Self::count_for(self.config.mode, frame))
            .sum()
    }

    fn count_for(mode: AnnotationMode, frame: &Frame) -> usize {
        match mode {
            AnnotationMode::Events => frame.events().len(),
            AnnotationMode::Tally => frame.tally() as usize,
        }
    }

    fn frame_mut(&mut self, id: FrameId) -> Result<&mut Frame> {
        self.frames.get_mut(&id).ok_or(Error::UnknownFrame(id))
    }
}
