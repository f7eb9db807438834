use serde::{Deserialize, Serialize};

use crate::error::{DigitizerError, DigitizerResult};

/// Mapping mode of a numeric axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AxisScale {
    /// Uniform spacing in raw data units.
    #[default]
    Linear,
    /// Uniform spacing in base-10 log units (range endpoints must be > 0).
    Log10,
}

impl AxisScale {
    #[must_use]
    pub fn from_log_flag(is_log: bool) -> Self {
        if is_log { Self::Log10 } else { Self::Linear }
    }

    #[must_use]
    pub fn is_log(self) -> bool {
        matches!(self, Self::Log10)
    }
}

/// Numeric range of one axis: `(min, max, scale)`.
///
/// `min == max` is accepted; such a degenerate axis maps every value to the
/// `min` anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AxisRangeRepr")]
pub struct AxisRange {
    min: f64,
    max: f64,
    scale: AxisScale,
}

#[derive(Deserialize)]
struct AxisRangeRepr {
    min: f64,
    max: f64,
    #[serde(default)]
    scale: AxisScale,
}

impl TryFrom<AxisRangeRepr> for AxisRange {
    type Error = DigitizerError;

    fn try_from(repr: AxisRangeRepr) -> Result<Self, Self::Error> {
        Self::new(repr.min, repr.max, repr.scale)
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            scale: AxisScale::Linear,
        }
    }
}

impl AxisRange {
    pub fn new(min: f64, max: f64, scale: AxisScale) -> DigitizerResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(DigitizerError::InvalidData(
                "axis range must be finite".to_owned(),
            ));
        }
        if scale.is_log() && (min <= 0.0 || max <= 0.0) {
            return Err(DigitizerError::InvalidData(format!(
                "log axis range must be > 0, got [{min}, {max}]"
            )));
        }
        Ok(Self { min, max, scale })
    }

    pub fn linear(min: f64, max: f64) -> DigitizerResult<Self> {
        Self::new(min, max, AxisScale::Linear)
    }

    pub fn log10(min: f64, max: f64) -> DigitizerResult<Self> {
        Self::new(min, max, AxisScale::Log10)
    }

    #[must_use]
    pub fn min(self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn scale(self) -> AxisScale {
        self.scale
    }

    #[must_use]
    pub fn is_log(self) -> bool {
        self.scale.is_log()
    }

    /// Normalized position of `value` within the range.
    #[must_use]
    pub fn fraction_of(self, value: f64) -> f64 {
        value_to_fraction(value, self.min, self.max, self.scale)
    }

    /// Data value at normalized position `fraction`.
    #[must_use]
    pub fn value_at(self, fraction: f64) -> f64 {
        fraction_to_value(fraction, self.min, self.max, self.scale)
    }
}

/// Fraction of `value` between `min` and `max`.
///
/// Zero-span ranges and log-domain violations (`value <= 0` or `min <= 0`)
/// yield `0.0` instead of an error.
#[must_use]
pub fn value_to_fraction(value: f64, min: f64, max: f64, scale: AxisScale) -> f64 {
    match scale {
        AxisScale::Linear => {
            let span = max - min;
            if span == 0.0 { 0.0 } else { (value - min) / span }
        }
        AxisScale::Log10 => {
            if value <= 0.0 || min <= 0.0 {
                return 0.0;
            }
            let span = max.log10() - min.log10();
            if span == 0.0 {
                0.0
            } else {
                (value.log10() - min.log10()) / span
            }
        }
    }
}

/// Inverse of [`value_to_fraction`] for in-domain ranges.
#[must_use]
pub fn fraction_to_value(fraction: f64, min: f64, max: f64, scale: AxisScale) -> f64 {
    match scale {
        AxisScale::Linear => min + fraction * (max - min),
        AxisScale::Log10 => {
            let log_min = min.log10();
            let log_max = max.log10();
            10f64.powf(log_min + fraction * (log_max - log_min))
        }
    }
}

/// Fraction of a pixel coordinate between two anchor coordinates.
#[must_use]
pub fn pixel_fraction(pixel: f64, pixel_min: f64, pixel_max: f64) -> f64 {
    let span = pixel_max - pixel_min;
    if span == 0.0 { 0.0 } else { (pixel - pixel_min) / span }
}
