//! Text rendering of session feedback.

use dropfreeze_core::{AssaySummary, FrameView, Signal};
use std::fmt::Write;

/// Warning shown in place of a missing frame image.
pub const NO_IMAGE_WARNING: &str = "No image file found for this frame!";

/// One-line description of a command outcome.
pub fn describe(signal: &Signal) -> String {
    match *signal {
        Signal::Marked { frame, at } => {
            format!("frame {frame}: frozen droplet marked at ({}, {})", at.x, at.y)
        }
        Signal::Unmarked { frame, at } => {
            format!("frame {frame}: frozen droplet removed at ({}, {})", at.x, at.y)
        }
        Signal::AlreadyMarked { holder, at, .. } => format!(
            "already a frozen droplet here: ({}, {}) was marked on frame {holder}",
            at.x, at.y
        ),
        Signal::Moved { frame, .. } => format!("moved to frame {frame}"),
        Signal::AtFirstFrame => "already on first frame".to_string(),
        Signal::AtLastFrame => "already on last frame".to_string(),
        Signal::TallyChanged { frame, tally } => format!("frame {frame}: tally {tally}"),
        Signal::TallyAtZero { frame } => format!("frame {frame}: tally already zero"),
        Signal::TallyDisabled => "tally commands need --mode tally".to_string(),
    }
}

/// Multi-line overlay for the current frame.
pub fn render_view(view: &FrameView<'_>) -> String {
    let frame = view.frame;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "[{}/{}] frame {}  {} °C  freezes: {} here, {} total",
        view.position,
        view.frame_count,
        frame.id,
        frame.sensor.thermocouple_temp,
        view.freezes_here,
        view.total_freezes
    );
    match frame.image.path() {
        Some(path) => {
            let _ = writeln!(out, "  image: {}", path.display());
        }
        None => {
            let _ = writeln!(out, "  {NO_IMAGE_WARNING}");
        }
    }
    for marker in &view.markers {
        let owner = if marker.current {
            "this frame".to_string()
        } else {
            format!("frame {}", marker.frame)
        };
        let _ = writeln!(out, "  O ({}, {})  {owner}", marker.at.x, marker.at.y);
    }
    out
}

/// Multi-line human-readable assay summary.
pub fn render_summary(summary: &AssaySummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Frames: {}", summary.frame_count);
    let _ = writeln!(
        out,
        "Frame ids: {} - {}",
        summary.frame_range.0, summary.frame_range.1
    );
    let _ = writeln!(
        out,
        "Time range: {} - {}",
        summary.time_range.0, summary.time_range.1
    );
    let _ = writeln!(
        out,
        "Thermocouple range: {} - {} °C",
        summary.thermocouple_range.0, summary.thermocouple_range.1
    );
    if summary.missing_images.is_empty() {
        let _ = writeln!(out, "Missing images: none");
    } else {
        let ids: Vec<String> = summary
            .missing_images
            .iter()
            .map(ToString::to_string)
            .collect();
        let _ = writeln!(
            out,
            "Missing images: {} ({})",
            ids.len(),
            ids.join(", ")
        );
    }
    out
}
