#![allow(clippy::cast_precision_loss, clippy::float_cmp)]
use approx::assert_relative_eq;
use dropfreeze_core::{
    fraction_frozen, AnnotationConfig, AnnotationMode, AssayModel, Frame, FrameId, ImageRef,
    OutputRow, PixelPoint, SensorReading,
};

// Frames 1..=n with the given thermocouple temperatures.
fn assay_with_temps(temps: &[f64], config: AnnotationConfig) -> AssayModel {
    let frames = temps.iter().enumerate().map(|(i, &temp)| {
        let id = i as i64 + 1;
        Frame::new(
            FrameId::new(id),
            SensorReading::new(id as f64 * 10.0, temp, temp, temp + 0.1),
            ImageRef::Missing,
        )
    });
    AssayModel::new(frames, config).unwrap()
}

fn mark(assay: &mut AssayModel, id: i64, x: f64, y: f64) {
    assay
        .toggle_event(FrameId::new(id), PixelPoint::new(x, y))
        .unwrap();
}

#[test]
fn test_no_events_gives_empty_table() {
    let assay = assay_with_temps(&[-5.0, -10.0], AnnotationConfig::default());
    assert!(fraction_frozen(&assay).is_empty());
}

#[test]
fn test_single_event_on_middle_frame() {
    let mut assay = assay_with_temps(&[-5.0, -10.0, -15.0], AnnotationConfig::default());
    mark(&mut assay, 2, 100.0, 100.0);

    assert_eq!(fraction_frozen(&assay), vec![OutputRow::new(-10.0, 1.0)]);
}

#[test]
fn test_identical_temperatures_sum_fractions() {
    let mut assay = assay_with_temps(&[-5.0, -5.0, -10.0], AnnotationConfig::default());
    mark(&mut assay, 1, 50.0, 50.0);
    mark(&mut assay, 2, 150.0, 50.0);

    // 0.5 and 1.0 from time order are summed, not re-normalized
    let table = fraction_frozen(&assay);
    assert_eq!(table.len(), 1);
    assert_relative_eq!(table[0].temperature, -5.0);
    assert_relative_eq!(table[0].fraction, 1.5);
}

#[test]
fn test_monotonic_cooling() {
    let mut assay = assay_with_temps(&[-4.0, -6.0, -8.0, -10.0], AnnotationConfig::default());
    mark(&mut assay, 1, 10.0, 10.0);
    mark(&mut assay, 3, 60.0, 10.0);
    mark(&mut assay, 3, 110.0, 10.0);
    mark(&mut assay, 4, 160.0, 10.0);

    let table = fraction_frozen(&assay);
    assert_eq!(
        table,
        vec![
            OutputRow::new(-4.0, 0.25),
            OutputRow::new(-8.0, 0.75),
            OutputRow::new(-10.0, 1.0),
        ]
    );
}

#[test]
fn test_noisy_temperature_is_resorted_without_recomputing() {
    // Frame 2 reads warmer than frame 1
    let mut assay = assay_with_temps(&[-6.0, -5.5, -9.0], AnnotationConfig::default());
    mark(&mut assay, 1, 10.0, 10.0);
    mark(&mut assay, 2, 60.0, 10.0);
    mark(&mut assay, 3, 110.0, 10.0);
    mark(&mut assay, 3, 160.0, 10.0);

    let table = fraction_frozen(&assay);
    assert_eq!(
        table,
        vec![
            OutputRow::new(-5.5, 0.5),
            OutputRow::new(-6.0, 0.25),
            OutputRow::new(-9.0, 1.0),
        ]
    );
}

#[test]
fn test_aggregation_is_idempotent() {
    let mut assay = assay_with_temps(&[-3.0, -7.0, -7.0, -12.0], AnnotationConfig::default());
    mark(&mut assay, 2, 10.0, 10.0);
    mark(&mut assay, 3, 60.0, 10.0);
    mark(&mut assay, 4, 110.0, 10.0);

    let first = fraction_frozen(&assay);
    let second = fraction_frozen(&assay);
    assert_eq!(first, second);
}

#[test]
fn test_droplet_count_denominator() {
    let config = AnnotationConfig::new().with_droplet_count(10);
    let mut assay = assay_with_temps(&[-5.0, -10.0], config);
    mark(&mut assay, 1, 10.0, 10.0);
    mark(&mut assay, 2, 60.0, 10.0);

    let table = fraction_frozen(&assay);
    assert_eq!(table.len(), 2);
    assert_relative_eq!(table[0].fraction, 0.1);
    assert_relative_eq!(table[1].fraction, 0.2);
}

#[test]
fn test_tally_mode_counts_tallies_only() {
    let config = AnnotationConfig::new().with_mode(AnnotationMode::Tally);
    let mut assay = assay_with_temps(&[-5.0, -10.0, -15.0], config);
    assay.increment_tally(FrameId::new(1)).unwrap();
    assay.increment_tally(FrameId::new(3)).unwrap();
    assay.increment_tally(FrameId::new(3)).unwrap();
    assay.increment_tally(FrameId::new(3)).unwrap();
    mark(&mut assay, 2, 10.0, 10.0);

    let table = fraction_frozen(&assay);
    assert_eq!(
        table,
        vec![OutputRow::new(-5.0, 0.25), OutputRow::new(-15.0, 1.0)]
    );
}
