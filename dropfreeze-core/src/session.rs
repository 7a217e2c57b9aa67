//! Interactive annotation session.
//!
//! A [`Session`] couples the assay with a navigator and turns discrete
//! operator commands into model changes. Every command either succeeds or
//! is rejected without side effects, and the outcome comes back as a
//! [`Signal`] for the presentation layer to report.
//!
//! The session ends with [`Session::finalize`], which consumes it, so the
//! output table is written at most once. If the sink fails the session is
//! handed back inside [`FinalizeError`]. Dropping a session without
//! finalizing writes nothing.

use crate::aggregation::{fraction_frozen, OutputRow};
use crate::{
    AnnotationMode, AssayModel, Frame, FrameId, FrameNavigator, NavigationOutcome, PixelPoint,
    Result, TallyOutcome, ToggleOutcome,
};
use std::convert::Infallible;

/// Operator commands accepted while a session is open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Click at a pixel position on the current frame.
    Click(PixelPoint),
    /// Show the next frame.
    Next,
    /// Show the previous frame.
    Previous,
    /// Add one freeze to the current frame's tally.
    IncrementTally,
    /// Remove one freeze from the current frame's tally.
    DecrementTally,
}

/// Advisory outcome of a command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// A new event was marked on the current frame.
    Marked { frame: FrameId, at: PixelPoint },
    /// An event of the current frame was removed.
    Unmarked { frame: FrameId, at: PixelPoint },
    /// The click hit an event that another frame already holds.
    AlreadyMarked {
        frame: FrameId,
        holder: FrameId,
        at: PixelPoint,
    },
    /// The navigator moved to another frame.
    Moved {
        index: usize,
        frame: FrameId,
        missing_image: bool,
    },
    /// Already on the first frame.
    AtFirstFrame,
    /// Already on the last frame.
    AtLastFrame,
    /// The current frame's tally changed.
    TallyChanged { frame: FrameId, tally: u32 },
    /// The current frame's tally is already zero.
    TallyAtZero { frame: FrameId },
    /// Tally commands are ignored in events mode.
    TallyDisabled,
}

/// Destination for the finished fraction-frozen table.
pub trait TableSink {
    /// Error raised while persisting.
    type Error;

    /// Persists the whole table.
    ///
    /// # Errors
    /// Implementation-defined.
    fn write_table(&mut self, rows: &[OutputRow]) -> std::result::Result<(), Self::Error>;
}

impl TableSink for Vec<OutputRow> {
    type Error = Infallible;

    fn write_table(&mut self, rows: &[OutputRow]) -> std::result::Result<(), Self::Error> {
        self.extend_from_slice(rows);
        Ok(())
    }
}

/// A finalize whose sink failed. The session comes back unchanged.
#[derive(thiserror::Error, Debug)]
#[error("could not write the fraction-frozen table: {error}")]
pub struct FinalizeError<E> {
    session: Box<Session>,
    error: E,
}

impl<E> FinalizeError<E> {
    /// The sink's error.
    pub fn error(&self) -> &E {
        &self.error
    }

    /// Reopens the session that failed to finalize.
    pub fn into_session(self) -> Session {
        *self.session
    }
}

/// A freeze marker to draw over the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// Marker position.
    pub at: PixelPoint,
    /// Frame holding the event.
    pub frame: FrameId,
    /// True if the event belongs to the frame on screen.
    pub current: bool,
}

/// Everything the presentation layer needs to redraw the current frame.
#[derive(Debug, Clone)]
pub struct FrameView<'a> {
    /// 1-based position of the frame in the sequence.
    pub position: usize,
    /// Number of frames in the assay.
    pub frame_count: usize,
    /// The frame on screen.
    pub frame: &'a Frame,
    /// Freezes counted on this frame under the configured mode.
    pub freezes_here: usize,
    /// Freezes counted across the whole assay.
    pub total_freezes: usize,
    /// Events of this frame and every earlier frame.
    pub markers: Vec<Marker>,
}

impl FrameView<'_> {
    /// True if the frame has no image and a placeholder must be shown.
    pub fn needs_placeholder(&self) -> bool {
        self.frame.image.is_missing()
    }
}

/// An open annotation session.
#[derive(Debug, Clone)]
pub struct Session {
    assay: AssayModel,
    navigator: FrameNavigator,
}

impl Session {
    /// Opens a session on the first frame of the assay.
    ///
    /// # Errors
    /// Returns `Error::EmptyAssay` if the assay has no frames.
    pub fn new(assay: AssayModel) -> Result<Self> {
        let navigator = FrameNavigator::new(assay.frames().to_vec())?;
        log::info!(
            "annotation session opened: {} frames, {} mode",
            assay.len(),
            assay.config().mode.name()
        );
        Ok(Self { assay, navigator })
    }

    /// The assay being annotated.
    pub fn assay(&self) -> &AssayModel {
        &self.assay
    }

    /// Id of the frame on screen.
    pub fn current_frame(&self) -> FrameId {
        self.navigator.current()
    }

    /// Applies one operator command.
    ///
    /// # Errors
    /// Returns `Error::UnknownFrame` only if the navigator and the model
    /// disagree about the frame set.
    pub fn handle(&mut self, command: Command) -> Result<Signal> {
        let frame = self.navigator.current();
        let signal = match command {
            Command::Click(point) => match self.assay.toggle_event(frame, point)? {
                ToggleOutcome::Marked(at) => Signal::Marked { frame, at },
                ToggleOutcome::Unmarked(at) => Signal::Unmarked { frame, at },
                ToggleOutcome::AlreadyMarked { holder, at } => {
                    Signal::AlreadyMarked { frame, holder, at }
                }
            },
            Command::Next => {
                let outcome = self.navigator.advance();
                self.navigated(outcome)
            }
            Command::Previous => {
                let outcome = self.navigator.retreat();
                self.navigated(outcome)
            }
            Command::IncrementTally | Command::DecrementTally
                if self.assay.config().mode == AnnotationMode::Events =>
            {
                Signal::TallyDisabled
            }
            Command::IncrementTally => Signal::TallyChanged {
                frame,
                tally: self.assay.increment_tally(frame)?,
            },
            Command::DecrementTally => match self.assay.decrement_tally(frame)? {
                TallyOutcome::Changed(tally) => Signal::TallyChanged { frame, tally },
                TallyOutcome::AtZero => Signal::TallyAtZero { frame },
            },
        };
        Ok(signal)
    }

    /// Describes the frame on screen.
    ///
    /// # Errors
    /// Returns `Error::UnknownFrame` only if the navigator and the model
    /// disagree about the frame set.
    pub fn view(&self) -> Result<FrameView<'_>> {
        let current = self.navigator.current();
        let frame = self
            .assay
            .frame(current)
            .ok_or(crate::Error::UnknownFrame(current))?;

        let markers = self
            .assay
            .iter()
            .take_while(|f| f.id <= current)
            .flat_map(|f| {
                f.events().iter().map(move |&at| Marker {
                    at,
                    frame: f.id,
                    current: f.id == current,
                })
            })
            .collect();

        Ok(FrameView {
            position: self.navigator.index() + 1,
            frame_count: self.navigator.len(),
            frame,
            freezes_here: self.assay.freeze_count(current),
            total_freezes: self.assay.total_freezes(),
            markers,
        })
    }

    /// Aggregates the assay, hands the table to `sink` and closes the
    /// session.
    ///
    /// # Errors
    /// Returns a `FinalizeError` holding the sink's error and the still-open
    /// session if persisting fails.
    pub fn finalize<S: TableSink>(
        self,
        sink: &mut S,
    ) -> std::result::Result<Vec<OutputRow>, FinalizeError<S::Error>> {
        let rows = fraction_frozen(&self.assay);
        if let Err(error) = sink.write_table(&rows) {
            log::warn!("fraction-frozen table not written, session kept open");
            return Err(FinalizeError {
                session: Box::new(self),
                error,
            });
        }
        log::info!(
            "session finalized: {} freezes, {} table rows",
            self.assay.total_freezes(),
            rows.len()
        );
        Ok(rows)
    }

    fn navigated(&self, outcome: NavigationOutcome) -> Signal {
        match outcome {
            NavigationOutcome::Moved(index) => {
                let frame = self.navigator.current();
                let missing_image = self
                    .assay
                    .frame(frame)
                    .map_or(true, |f| f.image.is_missing());
                if missing_image {
                    log::warn!("no image file found for frame {frame}");
                }
                Signal::Moved {
                    index,
                    frame,
                    missing_image,
                }
            }
            NavigationOutcome::AtFirst => Signal::AtFirstFrame,
            NavigationOutcome::AtLast => Signal::AtLastFrame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnnotationConfig, ImageRef, SensorReading};
    use std::path::PathBuf;

    fn session(mode: AnnotationMode) -> Session {
        let frames = (1..=3).map(|id| {
            let image = if id == 2 {
                ImageRef::Missing
            } else {
                ImageRef::Present(PathBuf::from(format!("{id}.jpg")))
            };
            Frame::new(
                FrameId::new(id),
                SensorReading::new(id as f64, -5.0, -5.0 * id as f64, -5.0),
                image,
            )
        });
        let assay = AssayModel::new(frames, AnnotationConfig::new().with_mode(mode)).unwrap();
        Session::new(assay).unwrap()
    }

    #[test]
    fn test_navigation_signals() {
        let mut s = session(AnnotationMode::Events);
        assert_eq!(s.handle(Command::Previous).unwrap(), Signal::AtFirstFrame);
        assert_eq!(
            s.handle(Command::Next).unwrap(),
            Signal::Moved {
                index: 1,
                frame: FrameId(2),
                missing_image: true,
            }
        );
        assert_eq!(
            s.handle(Command::Next).unwrap(),
            Signal::Moved {
                index: 2,
                frame: FrameId(3),
                missing_image: false,
            }
        );
        assert_eq!(s.handle(Command::Next).unwrap(), Signal::AtLastFrame);
        assert_eq!(s.current_frame(), FrameId(3));
    }

    #[test]
    fn test_click_signals() {
        let mut s = session(AnnotationMode::Events);
        let at = PixelPoint::new(40.0, 40.0);
        assert_eq!(
            s.handle(Command::Click(at)).unwrap(),
            Signal::Marked {
                frame: FrameId(1),
                at
            }
        );
        s.handle(Command::Next).unwrap();
        assert_eq!(
            s.handle(Command::Click(PixelPoint::new(45.0, 35.0))).unwrap(),
            Signal::AlreadyMarked {
                frame: FrameId(2),
                holder: FrameId(1),
                at
            }
        );
        s.handle(Command::Previous).unwrap();
        assert_eq!(
            s.handle(Command::Click(PixelPoint::new(41.0, 41.0))).unwrap(),
            Signal::Unmarked {
                frame: FrameId(1),
                at
            }
        );
    }

    #[test]
    fn test_tally_disabled_in_events_mode() {
        let mut s = session(AnnotationMode::Events);
        assert_eq!(
            s.handle(Command::IncrementTally).unwrap(),
            Signal::TallyDisabled
        );
        assert_eq!(s.assay().frame(FrameId(1)).unwrap().tally(), 0);
    }

    #[test]
    fn test_tally_mode() {
        let mut s = session(AnnotationMode::Tally);
        assert_eq!(
            s.handle(Command::DecrementTally).unwrap(),
            Signal::TallyAtZero { frame: FrameId(1) }
        );
        assert_eq!(
            s.handle(Command::IncrementTally).unwrap(),
            Signal::TallyChanged {
                frame: FrameId(1),
                tally: 1
            }
        );
        assert_eq!(s.view().unwrap().total_freezes, 1);
    }

    #[test]
    fn test_view_markers_cover_earlier_frames() {
        let mut s = session(AnnotationMode::Events);
        s.handle(Command::Click(PixelPoint::new(10.0, 10.0))).unwrap();
        s.handle(Command::Next).unwrap();
        s.handle(Command::Click(PixelPoint::new(100.0, 10.0))).unwrap();
        s.handle(Command::Next).unwrap();
        s.handle(Command::Click(PixelPoint::new(200.0, 10.0))).unwrap();
        s.handle(Command::Previous).unwrap();

        let view = s.view().unwrap();
        assert_eq!(view.position, 2);
        assert_eq!(view.frame_count, 3);
        assert_eq!(view.freezes_here, 1);
        assert_eq!(view.total_freezes, 3);
        assert!(view.needs_placeholder());
        assert_eq!(
            view.markers,
            vec![
                Marker {
                    at: PixelPoint::new(10.0, 10.0),
                    frame: FrameId(1),
                    current: false,
                },
                Marker {
                    at: PixelPoint::new(100.0, 10.0),
                    frame: FrameId(2),
                    current: true,
                },
            ]
        );
    }

    #[test]
    fn test_finalize_writes_table() {
        let mut s = session(AnnotationMode::Events);
        s.handle(Command::Next).unwrap();
        s.handle(Command::Click(PixelPoint::new(10.0, 10.0))).unwrap();

        let mut sink: Vec<OutputRow> = Vec::new();
        let rows = s.finalize(&mut sink).unwrap();
        assert_eq!(rows, vec![OutputRow::new(-10.0, 1.0)]);
        assert_eq!(sink, rows);
    }

    struct FullDisk;

    impl TableSink for FullDisk {
        type Error = &'static str;

        fn write_table(&mut self, _rows: &[OutputRow]) -> std::result::Result<(), Self::Error> {
            Err("no space left on device")
        }
    }

    #[test]
    fn test_failed_finalize_returns_session() {
        let mut s = session(AnnotationMode::Events);
        s.handle(Command::Next).unwrap();
        s.handle(Command::Click(PixelPoint::new(10.0, 10.0))).unwrap();

        let failed = s.finalize(&mut FullDisk).unwrap_err();
        assert_eq!(*failed.error(), "no space left on device");

        let reopened = failed.into_session();
        assert_eq!(reopened.assay().total_freezes(), 1);

        let mut sink: Vec<OutputRow> = Vec::new();
        let rows = reopened.finalize(&mut sink).unwrap();
        assert_eq!(rows, vec![OutputRow::new(-10.0, 1.0)]);
    }
}
