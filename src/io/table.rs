use std::collections::BTreeMap;
use std::path::Path;

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::core::dataset::Dataset;
use crate::error::{DigitizerError, DigitizerResult};

/// Renders datasets as a wide CSV table.
///
/// Header is `x` followed by one column per non-empty dataset (named after
/// the dataset). Rows hold the union of distinct X values in ascending
/// order; a cell is blank when that dataset has no point at the row's X.
/// When a dataset repeats an X, its last Y wins. Non-finite points are
/// rejected instead of being written as `inf`/`NaN` cells.
pub fn export_csv(datasets: &[Dataset]) -> DigitizerResult<String> {
    let columns: Vec<&Dataset> = datasets.iter().filter(|d| !d.is_empty()).collect();

    let mut rows: BTreeMap<OrderedFloat<f64>, Vec<Option<f64>>> = BTreeMap::new();
    for (column, dataset) in columns.iter().enumerate() {
        for point in dataset.points() {
            if !point.is_finite() {
                return Err(DigitizerError::InvalidData(format!(
                    "dataset `{}` has a non-finite point {point}",
                    dataset.name()
                )));
            }
            rows.entry(OrderedFloat(point.x))
                .or_insert_with(|| vec![None; columns.len()])[column] = Some(point.y);
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    let header = std::iter::once("x").chain(columns.iter().map(|d| d.name()));
    writer.write_record(header).map_err(csv_error)?;

    for (x, cells) in &rows {
        let record = std::iter::once(x.0.to_string()).chain(
            cells
                .iter()
                .map(|cell| cell.map(|y| y.to_string()).unwrap_or_default()),
        );
        writer.write_record(record).map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DigitizerError::Csv(format!("failed to flush csv: {e}")))?;
    debug!(columns = columns.len(), rows = rows.len(), "rendered csv");
    String::from_utf8(bytes).map_err(|e| DigitizerError::Csv(format!("csv is not utf-8: {e}")))
}

/// Writes [`export_csv`] output to `path`.
pub fn save_csv(path: &Path, datasets: &[Dataset]) -> DigitizerResult<()> {
    let text = export_csv(datasets)?;
    std::fs::write(path, text).map_err(|e| DigitizerError::io(path, e))
}

fn csv_error(err: csv::Error) -> DigitizerError {
    DigitizerError::Csv(err.to_string())
}
