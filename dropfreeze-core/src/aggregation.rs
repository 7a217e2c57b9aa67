//! Conversion of per-frame freezes into the fraction-frozen table.
//!
//! The table is built in three passes:
//!
//! 1. Walk frames in id (time) order and emit one candidate row per frame
//!    with at least one freeze, carrying the cumulative fraction so far.
//! 2. Sort the candidates by thermocouple temperature, warmest first.
//!    Fractions are not recomputed; each row keeps its time-order value.
//! 3. Merge *adjacent* rows with bit-identical temperatures by summing
//!    their fractions.
//!
//! Because step 1 accumulates in time order and step 3 sums cumulative
//! values, a merged row can exceed 1.0 and fractions can be locally
//! non-monotonic when the thermocouple reading is noisy. Near-equal
//! temperatures are never merged. Both effects are kept as-is.

use crate::AssayModel;
use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One row of the fraction-frozen table.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutputRow {
    /// Thermocouple temperature (°C).
    pub temperature: f64,
    /// Cumulative fraction of droplets frozen.
    pub fraction: f64,
}

impl OutputRow {
    /// Creates a new output row.
    pub fn new(temperature: f64, fraction: f64) -> Self {
        Self {
            temperature,
            fraction,
        }
    }
}

/// Builds the fraction-frozen table from the whole assay.
///
/// Returns an empty table when no freezes were counted.
#[must_use]
pub fn fraction_frozen(assay: &AssayModel) -> Vec<OutputRow> {
    let total = assay.total_freezes();
    if total == 0 {
        return Vec::new();
    }

    let denominator = match assay.config().droplet_count {
        Some(droplets) => {
            if total > droplets as usize {
                log::warn!(
                    "{total} freezes counted but the assay has only {droplets} droplets; \
                     fractions will exceed 1.0"
                );
            }
            f64::from(droplets)
        }
        None => total as f64,
    };

    let mut rows = candidate_rows(assay, denominator);
    sort_warmest_first(&mut rows);
    merge_adjacent(rows)
}

/// Time-ordered rows, one per frame with at least one freeze.
fn candidate_rows(assay: &AssayModel, denominator: f64) -> Vec<OutputRow> {
    let mut cumulative = 0usize;
    let mut rows = Vec::new();

    for &id in assay.frames() {
        let count = assay.freeze_count(id);
        if count == 0 {
            continue;
        }
        let Some(frame) = assay.frame(id) else {
            continue;
        };
        cumulative += count;
        rows.push(OutputRow::new(
            frame.sensor.thermocouple_temp,
            cumulative as f64 / denominator,
        ));
    }

    rows
}

/// Sorts by temperature descending; equal temperatures put the larger
/// fraction first.
fn sort_warmest_first(rows: &mut [OutputRow]) {
    rows.sort_by(|a, b| {
        match b.temperature.total_cmp(&a.temperature) {
            Ordering::Equal => b.fraction.total_cmp(&a.fraction),
            other => other,
        }
    });
}

/// Collapses runs of identical temperatures into one row whose fraction is
/// the sum of the run.
#[allow(clippy::float_cmp)]
fn merge_adjacent(rows: Vec<OutputRow>) -> Vec<OutputRow> {
    let mut merged: Vec<OutputRow> = Vec::with_capacity(rows.len());
    for row in rows {
        match merged.last_mut() {
            Some(last) if last.temperature == row.temperature => last.fraction += row.fraction,
            _ => merged.push(row),
        }
    }
    merged
}
