use tracing::{debug, warn};

use crate::config::TraceConfig;
use crate::core::color::{ColorMetric, Rgb};
use crate::core::dataset::Dataset;
use crate::core::transform::CoordinateTransformer;
use crate::core::types::Point;
use crate::error::{DigitizerError, DigitizerResult};

use super::pixels::PixelSource;

/// Inclusive pixel-column window to scan. Clamped to the image at trace time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRange {
    pub start: u32,
    pub end: u32,
}

impl ColumnRange {
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Every column of the image.
    #[must_use]
    pub fn full() -> Self {
        Self::new(0, u32::MAX)
    }

    /// Clamped `(start, end)` for an image `width` pixels wide, or `None`
    /// when nothing remains to scan.
    #[must_use]
    pub fn clamp_to(self, width: u32) -> Option<(u32, u32)> {
        let last = width.checked_sub(1)?;
        let end = self.end.min(last);
        (self.start <= end).then_some((self.start, end))
    }
}

impl Default for ColumnRange {
    fn default() -> Self {
        Self::full()
    }
}

/// Best-matching pixel of one scanned column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnMatch {
    pub column: u32,
    pub row: u32,
    pub distance: f64,
}

/// Per-column color-matching curve tracer.
///
/// For each scanned column the row whose color is nearest to the target is
/// selected; ties keep the topmost row. Each selected pixel becomes one
/// point, so the output follows increasing pixel column order.
///
/// Cost is one color distance per scanned pixel and one output entry per
/// column; the image is read in place and never copied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoTracer {
    columns: ColumnRange,
    metric: ColorMetric,
    column_step: u32,
}

impl Default for AutoTracer {
    fn default() -> Self {
        Self::new(ColumnRange::full())
    }
}

impl AutoTracer {
    #[must_use]
    pub fn new(columns: ColumnRange) -> Self {
        Self {
            columns,
            metric: ColorMetric::default(),
            column_step: 1,
        }
    }

    pub fn from_config(config: TraceConfig, columns: ColumnRange) -> DigitizerResult<Self> {
        Self::new(columns)
            .with_metric(config.color_metric)
            .with_column_step(config.column_step)
    }

    #[must_use]
    pub fn with_metric(mut self, metric: ColorMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_column_step(mut self, step: u32) -> DigitizerResult<Self> {
        if step == 0 {
            return Err(DigitizerError::InvalidData(
                "trace column step must be >= 1".to_owned(),
            ));
        }
        self.column_step = step;
        Ok(self)
    }

    #[must_use]
    pub fn columns(&self) -> ColumnRange {
        self.columns
    }

    #[must_use]
    pub fn metric(&self) -> ColorMetric {
        self.metric
    }

    /// Number of columns a trace over an image `width` pixels wide scans.
    #[must_use]
    pub fn column_count(&self, width: u32) -> usize {
        match self.columns.clamp_to(width) {
            Some((start, end)) => ((end - start) / self.column_step) as usize + 1,
            None => 0,
        }
    }

    /// Finds the best-matching row of every scanned column.
    ///
    /// Columns without any readable pixel are skipped.
    pub fn match_columns<I>(&self, image: &I, target: Rgb) -> Vec<ColumnMatch>
    where
        I: PixelSource + ?Sized,
    {
        let height = image.height();
        let Some((start, end)) = self.columns.clamp_to(image.width()) else {
            return Vec::new();
        };
        if height == 0 {
            return Vec::new();
        }

        let mut matches = Vec::with_capacity(self.column_count(image.width()));
        let mut column = start;
        loop {
            if let Some(found) = self.best_row(image, column, height, target) {
                matches.push(found);
            }
            match column.checked_add(self.column_step) {
                Some(next) if next <= end => column = next,
                _ => break,
            }
        }
        matches
    }

    /// Traces `target` and converts each matched pixel to data coordinates.
    pub fn trace<I>(
        &self,
        image: &I,
        target: Rgb,
        transformer: &CoordinateTransformer<'_>,
        use_secondary_y: bool,
    ) -> Vec<Point>
    where
        I: PixelSource + ?Sized,
    {
        if !transformer.is_calibrated() {
            warn!("auto-trace on incomplete calibration; points collapse to the origin");
        }
        if use_secondary_y && transformer.calibration().secondary_y_axis().is_none() {
            warn!("secondary Y axis requested but not configured; using the primary range");
        }

        let matches = self.match_columns(image, target);
        let matched = matches.len();
        let points: Vec<Point> = matches
            .into_iter()
            .map(|m| transformer.to_data(f64::from(m.column), f64::from(m.row), use_secondary_y))
            .filter(|p| p.is_finite())
            .collect();
        if points.len() < matched {
            warn!(
                dropped = matched - points.len(),
                "traced pixels map outside the representable data range"
            );
        }

        debug!(
            target = %target,
            scanned = self.column_count(image.width()),
            traced = points.len(),
            use_secondary_y,
            "auto-trace finished"
        );
        points
    }

    /// Traces using the dataset's color and secondary-axis flag.
    pub fn trace_dataset<I>(
        &self,
        image: &I,
        dataset: &Dataset,
        transformer: &CoordinateTransformer<'_>,
    ) -> Vec<Point>
    where
        I: PixelSource + ?Sized,
    {
        self.trace(
            image,
            dataset.color().rgb(),
            transformer,
            dataset.uses_secondary_y(),
        )
    }

    fn best_row<I>(&self, image: &I, column: u32, height: u32, target: Rgb) -> Option<ColumnMatch>
    where
        I: PixelSource + ?Sized,
    {
        let mut best: Option<ColumnMatch> = None;
        for row in 0..height {
            let Some(color) = image.color_at(column, row) else {
                continue;
            };
            let distance = self.metric.distance(target, color);
            // strict comparison keeps the topmost row on ties
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(ColumnMatch {
                    column,
                    row,
                    distance,
                });
            }
        }
        best
    }
}

/// One-shot trace over `columns` with default tracer settings.
pub fn trace<I>(
    image: &I,
    target: Rgb,
    transformer: &CoordinateTransformer<'_>,
    use_secondary_y: bool,
    columns: ColumnRange,
) -> Vec<Point>
where
    I: PixelSource + ?Sized,
{
    AutoTracer::new(columns).trace(image, target, transformer, use_secondary_y)
}
