//! dropfreeze-core: Annotation and aggregation engine for droplet-freezing assays.
//!
//! This crate holds the in-memory assay model (frames, sensor readings and
//! freezing events), the click toggle logic, frame navigation, and the
//! conversion of per-frame freezes into a fraction-frozen table.
//!

pub mod aggregation;
pub mod assay;
pub mod config;
pub mod error;
pub mod frame;
pub mod navigator;
pub mod point;
pub mod session;
pub mod summary;

pub use aggregation::{fraction_frozen, OutputRow};
pub use assay::{AssayModel, TallyOutcome, ToggleOutcome};
pub use config::{AnnotationConfig, AnnotationMode, DEFAULT_EXCLUSION_RADIUS};
pub use error::{Error, Result};
pub use frame::{Frame, FrameId, ImageRef, SensorReading};
pub use navigator::{FrameNavigator, NavigationOutcome};
pub use point::PixelPoint;
pub use session::{Command, FinalizeError, FrameView, Marker, Session, Signal, TableSink};
pub use summary::AssaySummary;
