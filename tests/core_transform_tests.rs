use approx::assert_abs_diff_eq;
use chart_digitizer::DigitizerError;
use chart_digitizer::core::{
    AnchorKind, AxisRange, Calibration, CalibrationAnchors, CanvasPoint, CoordinateTransformer,
    Point,
};

fn anchors() -> CalibrationAnchors {
    CalibrationAnchors {
        x_min: CanvasPoint::new(100.0, 300.0),
        x_max: CanvasPoint::new(500.0, 300.0),
        y_min: CanvasPoint::new(100.0, 500.0),
        y_max: CanvasPoint::new(100.0, 100.0),
    }
}

fn linear_calibration() -> Calibration {
    Calibration::new(
        AxisRange::linear(0.0, 10.0).expect("x range"),
        AxisRange::linear(0.0, 100.0).expect("y range"),
    )
    .with_anchors(anchors())
}

#[test]
fn linear_axes_map_both_directions() {
    let calibration = linear_calibration();
    let transformer = CoordinateTransformer::new(&calibration);

    let canvas = transformer.to_canvas(2.5, 25.0, false);
    assert_abs_diff_eq!(canvas.x, 200.0, epsilon = 1e-9);
    assert_abs_diff_eq!(canvas.y, 400.0, epsilon = 1e-9);

    let data = transformer.to_data(200.0, 400.0, false);
    assert_abs_diff_eq!(data.x, 2.5, epsilon = 1e-9);
    assert_abs_diff_eq!(data.y, 25.0, epsilon = 1e-9);
}

#[test]
fn log_axes_map_both_directions() {
    let calibration = Calibration::new(
        AxisRange::log10(1.0, 100.0).expect("x range"),
        AxisRange::log10(1.0, 10_000.0).expect("y range"),
    )
    .with_anchors(anchors());
    let transformer = CoordinateTransformer::new(&calibration);

    let canvas = transformer.to_canvas(10.0, 100.0, false);
    assert_abs_diff_eq!(canvas.x, 300.0, epsilon = 1e-9);
    assert_abs_diff_eq!(canvas.y, 300.0, epsilon = 1e-9);

    let data = transformer.to_data(canvas.x, canvas.y, false);
    assert_abs_diff_eq!(data.x, 10.0, epsilon = 1e-6);
    assert_abs_diff_eq!(data.y, 100.0, epsilon = 1e-6);
}

#[test]
fn incomplete_calibration_yields_origin() {
    let mut calibration = linear_calibration();
    calibration.clear_anchor(AnchorKind::YMin);
    let transformer = CoordinateTransformer::new(&calibration);

    assert!(!transformer.is_calibrated());
    assert_eq!(transformer.to_canvas(2.5, 25.0, false), CanvasPoint::ORIGIN);
    assert_eq!(transformer.to_data(200.0, 400.0, true), Point::new(0.0, 0.0));
}

#[test]
fn checked_variants_report_missing_calibration() {
    let calibration = Calibration::default();
    let transformer = CoordinateTransformer::new(&calibration);

    let err = transformer
        .try_to_data(1.0, 1.0, false)
        .expect_err("uncalibrated must fail");
    assert!(matches!(err, DigitizerError::Uncalibrated));
    assert!(transformer.try_to_canvas(1.0, 1.0, false).is_err());
}

#[test]
fn secondary_axis_shares_pixel_anchors() {
    let calibration = linear_calibration()
        .with_secondary_y_axis(Some(AxisRange::linear(0.0, 1.0).expect("y2 range")));
    let transformer = CoordinateTransformer::new(&calibration);

    let primary = transformer.to_canvas(2.5, 25.0, false);
    let secondary = transformer.to_canvas(2.5, 0.25, true);
    assert_abs_diff_eq!(primary.x, secondary.x, epsilon = 1e-12);
    assert_abs_diff_eq!(primary.y, secondary.y, epsilon = 1e-9);

    let data = transformer.to_data(200.0, 400.0, true);
    assert_abs_diff_eq!(data.y, 0.25, epsilon = 1e-12);
}

#[test]
fn secondary_request_without_secondary_axis_uses_primary() {
    let calibration = linear_calibration();
    let transformer = CoordinateTransformer::new(&calibration);

    assert_eq!(
        transformer.to_canvas(2.5, 25.0, true),
        transformer.to_canvas(2.5, 25.0, false)
    );
}

#[test]
fn degenerate_axis_maps_to_min_anchor() {
    let calibration = Calibration::new(
        AxisRange::linear(5.0, 5.0).expect("flat x range"),
        AxisRange::linear(0.0, 100.0).expect("y range"),
    )
    .with_anchors(anchors());
    let transformer = CoordinateTransformer::new(&calibration);

    let canvas = transformer.to_canvas(42.0, 50.0, false);
    assert_abs_diff_eq!(canvas.x, 100.0, epsilon = 1e-12);
}

#[test]
fn zero_pixel_span_maps_to_min_value() {
    let mut anchors = anchors();
    anchors.x_max = anchors.x_min;
    let calibration = Calibration::new(
        AxisRange::linear(0.0, 10.0).expect("x range"),
        AxisRange::linear(0.0, 100.0).expect("y range"),
    )
    .with_anchors(anchors);
    let transformer = CoordinateTransformer::new(&calibration);

    let data = transformer.to_data(321.0, 400.0, false);
    assert_eq!(data.x, 0.0);
    assert_abs_diff_eq!(data.y, 25.0, epsilon = 1e-9);
}

#[test]
fn non_positive_value_on_log_axis_maps_to_min_anchor() {
    let calibration = Calibration::new(
        AxisRange::log10(1.0, 100.0).expect("x range"),
        AxisRange::linear(0.0, 100.0).expect("y range"),
    )
    .with_anchors(anchors());
    let transformer = CoordinateTransformer::new(&calibration);

    let canvas = transformer.to_canvas(0.0, 50.0, false);
    assert_abs_diff_eq!(canvas.x, 100.0, epsilon = 1e-12);
    let canvas = transformer.to_canvas(-7.0, 50.0, false);
    assert_abs_diff_eq!(canvas.x, 100.0, epsilon = 1e-12);
    assert!(canvas.y.is_finite());
}
