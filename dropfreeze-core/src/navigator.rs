//! Frame-by-frame navigation over the ordered frame ids.

use crate::{Error, FrameId, Result};

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The navigator moved to this index.
    Moved(usize),
    /// Already on the first frame; nothing changed.
    AtFirst,
    /// Already on the last frame; nothing changed.
    AtLast,
}

/// Tracks which frame is currently shown.
#[derive(Debug, Clone)]
pub struct FrameNavigator {
    ids: Vec<FrameId>,
    index: usize,
}

impl FrameNavigator {
    /// Creates a navigator positioned on the first of `ids`.
    ///
    /// # Errors
    /// Returns `Error::EmptyAssay` if `ids` is empty.
    pub fn new(ids: Vec<FrameId>) -> Result<Self> {
        if ids.is_empty() {
            return Err(Error::EmptyAssay);
        }
        Ok(Self { ids, index: 0 })
    }

    /// Index of the current frame, in `0..len()`.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Id of the current frame.
    #[must_use]
    pub fn current(&self) -> FrameId {
        self.ids[self.index]
    }

    /// Number of navigable frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always false; a navigator is never built over zero frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Moves to the next frame unless already on the last one.
    pub fn advance(&mut self) -> NavigationOutcome {
        if self.index + 1 < self.ids.len() {
            self.index += 1;
            NavigationOutcome::Moved(self.index)
        } else {
            NavigationOutcome::AtLast
        }
    }

    /// Moves to the previous frame unless already on the first one.
    pub fn retreat(&mut self) -> NavigationOutcome {
        if self.index > 0 {
            self.index -= 1;
            NavigationOutcome::Moved(self.index)
        } else {
            NavigationOutcome::AtFirst
        }
    }
}
