use crate::core::axis::{AxisRange, pixel_fraction};
use crate::core::calibration::{Calibration, CalibrationAnchors};
use crate::core::types::{CanvasPoint, Point};
use crate::error::{DigitizerError, DigitizerResult};

/// Bidirectional pixel <-> data mapping over a borrowed [`Calibration`].
///
/// X uses the `x` coordinate of the X anchors; Y uses the `y` coordinate of
/// the Y anchors. The secondary Y axis shares the primary Y anchors and only
/// swaps the numeric range.
///
/// On an incomplete calibration `to_canvas`/`to_data` return the origin.
/// Use [`CoordinateTransformer::is_calibrated`] or the `try_` variants when
/// "uncalibrated" must be told apart from data at the origin.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateTransformer<'a> {
    calibration: &'a Calibration,
}

impl<'a> CoordinateTransformer<'a> {
    #[must_use]
    pub fn new(calibration: &'a Calibration) -> Self {
        Self { calibration }
    }

    #[must_use]
    pub fn calibration(&self) -> &'a Calibration {
        self.calibration
    }

    #[must_use]
    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_complete()
    }

    /// Maps a data point to pixel space, or `(0, 0)` when uncalibrated.
    #[must_use]
    pub fn to_canvas(&self, data_x: f64, data_y: f64, use_secondary_y: bool) -> CanvasPoint {
        self.try_to_canvas(data_x, data_y, use_secondary_y)
            .unwrap_or(CanvasPoint::ORIGIN)
    }

    /// Maps a pixel position to data space, or `(0, 0)` when uncalibrated.
    #[must_use]
    pub fn to_data(&self, canvas_x: f64, canvas_y: f64, use_secondary_y: bool) -> Point {
        self.try_to_data(canvas_x, canvas_y, use_secondary_y)
            .unwrap_or_default()
    }

    pub fn try_to_canvas(
        &self,
        data_x: f64,
        data_y: f64,
        use_secondary_y: bool,
    ) -> DigitizerResult<CanvasPoint> {
        let anchors = self.anchors()?;
        let (x_axis, y_axis) = self.axes(use_secondary_y);

        let t = x_axis.fraction_of(data_x);
        let u = y_axis.fraction_of(data_y);
        Ok(CanvasPoint::new(
            lerp(anchors.x_min.x, anchors.x_max.x, t),
            lerp(anchors.y_min.y, anchors.y_max.y, u),
        ))
    }

    pub fn try_to_data(
        &self,
        canvas_x: f64,
        canvas_y: f64,
        use_secondary_y: bool,
    ) -> DigitizerResult<Point> {
        let anchors = self.anchors()?;
        let (x_axis, y_axis) = self.axes(use_secondary_y);

        let t = pixel_fraction(canvas_x, anchors.x_min.x, anchors.x_max.x);
        let u = pixel_fraction(canvas_y, anchors.y_min.y, anchors.y_max.y);
        Ok(Point::new(x_axis.value_at(t), y_axis.value_at(u)))
    }

    pub fn point_to_canvas(&self, point: Point, use_secondary_y: bool) -> CanvasPoint {
        self.to_canvas(point.x, point.y, use_secondary_y)
    }

    fn anchors(&self) -> DigitizerResult<CalibrationAnchors> {
        self.calibration
            .anchors()
            .ok_or(DigitizerError::Uncalibrated)
    }

    fn axes(&self, use_secondary_y: bool) -> (AxisRange, AxisRange) {
        (
            self.calibration.x_axis(),
            self.calibration.y_axis_for(use_secondary_y),
        )
    }
}

fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + t * (end - start)
}
