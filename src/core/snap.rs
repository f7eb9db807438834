use ordered_float::OrderedFloat;

use crate::core::types::Point;
use crate::error::{DigitizerError, DigitizerResult};

/// Snaps X values to the nearest of a configured set of targets.
///
/// Useful when digitizing series sampled at known positions: a click that
/// lands between pixels is pulled onto the exact sample X.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XSnapper {
    targets: Vec<f64>,
}

impl XSnapper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the target set. Targets must be finite.
    pub fn set_targets(&mut self, targets: impl IntoIterator<Item = f64>) -> DigitizerResult<()> {
        let mut targets: Vec<f64> = targets.into_iter().collect();
        if targets.iter().any(|x| !x.is_finite()) {
            return Err(DigitizerError::InvalidData(
                "snap targets must be finite".to_owned(),
            ));
        }
        targets.sort_by_key(|x| OrderedFloat(*x));
        self.targets = targets;
        Ok(())
    }

    pub fn add_target(&mut self, x: f64) -> DigitizerResult<()> {
        if !x.is_finite() {
            return Err(DigitizerError::InvalidData(
                "snap target must be finite".to_owned(),
            ));
        }
        let at = self
            .targets
            .partition_point(|t| OrderedFloat(*t) < OrderedFloat(x));
        self.targets.insert(at, x);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    /// Sorted targets.
    #[must_use]
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    /// Nearest target to `x`; `x` itself when no targets are set. Ties go
    /// to the smaller target.
    #[must_use]
    pub fn snap_x(&self, x: f64) -> f64 {
        let at = self
            .targets
            .partition_point(|t| OrderedFloat(*t) < OrderedFloat(x));
        let below = at.checked_sub(1).and_then(|i| self.targets.get(i));
        let above = self.targets.get(at);
        match (below, above) {
            (Some(&lo), Some(&hi)) => {
                if (x - lo).abs() <= (hi - x).abs() {
                    lo
                } else {
                    hi
                }
            }
            (Some(&lo), None) => lo,
            (None, Some(&hi)) => hi,
            (None, None) => x,
        }
    }

    #[must_use]
    pub fn snap_point(&self, point: Point) -> Point {
        Point::new(self.snap_x(point.x), point.y)
    }
}
