use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::axis::AxisRange;
use crate::core::types::CanvasPoint;

/// Which axis extreme a canvas anchor marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorKind {
    XMin,
    XMax,
    YMin,
    YMax,
}

impl AnchorKind {
    pub const ALL: [AnchorKind; 4] = [Self::XMin, Self::XMax, Self::YMin, Self::YMax];

    fn index(self) -> usize {
        match self {
            Self::XMin => 0,
            Self::XMax => 1,
            Self::YMin => 2,
            Self::YMax => 3,
        }
    }
}

/// The full set of anchors, available only once calibration is complete.
///
/// The X mapping reads the `x` coordinate of the X anchors and the Y mapping
/// reads the `y` coordinate of the Y anchors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationAnchors {
    pub x_min: CanvasPoint,
    pub x_max: CanvasPoint,
    pub y_min: CanvasPoint,
    pub y_max: CanvasPoint,
}

/// Pixel anchors plus numeric axis ranges for one chart image.
///
/// Anchors are set and cleared independently by the UI layer; the
/// calibration is usable only when [`Calibration::is_complete`] holds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Calibration {
    #[serde(default)]
    anchors: [Option<CanvasPoint>; 4],
    #[serde(default)]
    x_axis: AxisRange,
    #[serde(default)]
    y_axis: AxisRange,
    #[serde(default)]
    secondary_y_axis: Option<AxisRange>,
}

impl Calibration {
    /// Creates an uncalibrated state with the given numeric ranges.
    #[must_use]
    pub fn new(x_axis: AxisRange, y_axis: AxisRange) -> Self {
        Self {
            anchors: [None; 4],
            x_axis,
            y_axis,
            secondary_y_axis: None,
        }
    }

    #[must_use]
    pub fn with_secondary_y_axis(mut self, axis: Option<AxisRange>) -> Self {
        self.secondary_y_axis = axis;
        self
    }

    /// Sets all four anchors at once.
    #[must_use]
    pub fn with_anchors(mut self, anchors: CalibrationAnchors) -> Self {
        self.set_anchor(AnchorKind::XMin, anchors.x_min);
        self.set_anchor(AnchorKind::XMax, anchors.x_max);
        self.set_anchor(AnchorKind::YMin, anchors.y_min);
        self.set_anchor(AnchorKind::YMax, anchors.y_max);
        self
    }

    pub fn set_anchor(&mut self, kind: AnchorKind, position: CanvasPoint) {
        trace!(?kind, x = position.x, y = position.y, "set calibration anchor");
        self.anchors[kind.index()] = Some(position);
    }

    pub fn clear_anchor(&mut self, kind: AnchorKind) {
        self.anchors[kind.index()] = None;
    }

    #[must_use]
    pub fn anchor(&self, kind: AnchorKind) -> Option<CanvasPoint> {
        self.anchors[kind.index()]
    }

    /// Clears every anchor; axis ranges are kept.
    pub fn reset_anchors(&mut self) {
        self.anchors = [None; 4];
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.anchors.iter().all(Option::is_some)
    }

    /// Returns the anchor set when all four anchors are present.
    #[must_use]
    pub fn anchors(&self) -> Option<CalibrationAnchors> {
        match self.anchors {
            [Some(x_min), Some(x_max), Some(y_min), Some(y_max)] => Some(CalibrationAnchors {
                x_min,
                x_max,
                y_min,
                y_max,
            }),
            _ => None,
        }
    }

    /// Anchor kinds still missing, in `XMin, XMax, YMin, YMax` order.
    #[must_use]
    pub fn missing_anchors(&self) -> Vec<AnchorKind> {
        AnchorKind::ALL
            .into_iter()
            .filter(|kind| self.anchor(*kind).is_none())
            .collect()
    }

    #[must_use]
    pub fn x_axis(&self) -> AxisRange {
        self.x_axis
    }

    #[must_use]
    pub fn y_axis(&self) -> AxisRange {
        self.y_axis
    }

    #[must_use]
    pub fn secondary_y_axis(&self) -> Option<AxisRange> {
        self.secondary_y_axis
    }

    pub fn set_x_axis(&mut self, axis: AxisRange) {
        self.x_axis = axis;
    }

    pub fn set_y_axis(&mut self, axis: AxisRange) {
        self.y_axis = axis;
    }

    pub fn set_secondary_y_axis(&mut self, axis: Option<AxisRange>) {
        self.secondary_y_axis = axis;
    }

    /// Y range used for a dataset; falls back to the primary range when no
    /// secondary axis is configured.
    #[must_use]
    pub fn y_axis_for(&self, use_secondary_y: bool) -> AxisRange {
        if use_secondary_y {
            self.secondary_y_axis.unwrap_or(self.y_axis)
        } else {
            self.y_axis
        }
    }
}
