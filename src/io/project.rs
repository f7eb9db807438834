use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::core::axis::{AxisRange, AxisScale};
use crate::core::calibration::Calibration;
use crate::core::color::HexColor;
use crate::core::dataset::Dataset;
use crate::core::types::Point;
use crate::error::{DigitizerError, DigitizerResult};

/// Wire names of every project field for one schema version.
///
/// Keeps snake_case wire naming separate from the in-memory field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectFields {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub y2_label: &'static str,
    pub x_min: &'static str,
    pub x_max: &'static str,
    pub y_min: &'static str,
    pub y_max: &'static str,
    pub x_log: &'static str,
    pub y_log: &'static str,
    pub y2_min: &'static str,
    pub y2_max: &'static str,
    pub y2_log: &'static str,
    pub datasets: &'static str,
    pub dataset_name: &'static str,
    pub dataset_color: &'static str,
    pub dataset_visible: &'static str,
    pub dataset_use_secondary_y: &'static str,
    pub dataset_points: &'static str,
}

pub const PROJECT_FIELDS_V1: ProjectFields = ProjectFields {
    title: "title",
    x_label: "xlabel",
    y_label: "ylabel",
    y2_label: "y2label",
    x_min: "x_min",
    x_max: "x_max",
    y_min: "y_min",
    y_max: "y_max",
    x_log: "x_log",
    y_log: "y_log",
    y2_min: "y2_min",
    y2_max: "y2_max",
    y2_log: "y2_log",
    datasets: "datasets",
    dataset_name: "name",
    dataset_color: "color",
    dataset_visible: "visible",
    dataset_use_secondary_y: "use_secondary_y",
    dataset_points: "points",
};

const FIELDS: ProjectFields = PROJECT_FIELDS_V1;

/// Title and axis labels of a project.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectMeta {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub y2_label: Option<String>,
}

/// Transient import/export view of a digitizing session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Project {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub y2_label: Option<String>,
    pub x_axis: AxisRange,
    pub y_axis: AxisRange,
    pub secondary_y_axis: Option<AxisRange>,
    /// Display/legend order.
    pub datasets: Vec<Dataset>,
}

impl Project {
    /// Snapshots labels, calibration ranges and datasets for export.
    #[must_use]
    pub fn from_session(meta: ProjectMeta, calibration: &Calibration, datasets: &[Dataset]) -> Self {
        Self {
            title: meta.title,
            x_label: meta.x_label,
            y_label: meta.y_label,
            y2_label: meta.y2_label,
            x_axis: calibration.x_axis(),
            y_axis: calibration.y_axis(),
            secondary_y_axis: calibration.secondary_y_axis(),
            datasets: datasets.to_vec(),
        }
    }

    #[must_use]
    pub fn meta(&self) -> ProjectMeta {
        ProjectMeta {
            title: self.title.clone(),
            x_label: self.x_label.clone(),
            y_label: self.y_label.clone(),
            y2_label: self.y2_label.clone(),
        }
    }

    /// Writes the numeric ranges into `calibration`; anchors are untouched.
    pub fn apply_axes(&self, calibration: &mut Calibration) {
        calibration.set_x_axis(self.x_axis);
        calibration.set_y_axis(self.y_axis);
        calibration.set_secondary_y_axis(self.secondary_y_axis);
    }

    /// Datasets that carry at least one point, in display order.
    pub fn non_empty_datasets(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter().filter(|d| !d.is_empty())
    }

    /// Builds the JSON document. Empty datasets are left out and the
    /// secondary-axis fields appear only when that axis is configured.
    ///
    /// JSON has no encoding for infinities or NaN, so a non-finite point is
    /// an error rather than a silent `null`.
    pub fn to_json_value(&self) -> DigitizerResult<Value> {
        let mut root = Map::new();
        root.insert(FIELDS.title.into(), Value::from(self.title.as_str()));
        root.insert(FIELDS.x_label.into(), Value::from(self.x_label.as_str()));
        root.insert(FIELDS.y_label.into(), Value::from(self.y_label.as_str()));
        if let Some(label) = &self.y2_label {
            root.insert(FIELDS.y2_label.into(), Value::from(label.as_str()));
        }
        root.insert(FIELDS.x_min.into(), Value::from(self.x_axis.min()));
        root.insert(FIELDS.x_max.into(), Value::from(self.x_axis.max()));
        root.insert(FIELDS.y_min.into(), Value::from(self.y_axis.min()));
        root.insert(FIELDS.y_max.into(), Value::from(self.y_axis.max()));
        root.insert(FIELDS.x_log.into(), Value::from(self.x_axis.is_log()));
        root.insert(FIELDS.y_log.into(), Value::from(self.y_axis.is_log()));
        if let Some(axis) = self.secondary_y_axis {
            root.insert(FIELDS.y2_min.into(), Value::from(axis.min()));
            root.insert(FIELDS.y2_max.into(), Value::from(axis.max()));
            root.insert(FIELDS.y2_log.into(), Value::from(axis.is_log()));
        }

        let datasets = self
            .non_empty_datasets()
            .map(dataset_to_json)
            .collect::<DigitizerResult<Vec<_>>>()?;
        root.insert(FIELDS.datasets.into(), Value::Array(datasets));
        Ok(Value::Object(root))
    }

    pub fn to_json_string(&self, pretty: bool) -> DigitizerResult<String> {
        let value = self.to_json_value()?;
        let text = if pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        text.map_err(|e| DigitizerError::InvalidProject(format!("failed to serialize project: {e}")))
    }

    pub fn to_json_pretty(&self) -> DigitizerResult<String> {
        self.to_json_string(true)
    }

    /// Parses a project document. Nothing is returned on failure.
    pub fn from_json_str(input: &str) -> DigitizerResult<Self> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| DigitizerError::InvalidProject(format!("malformed project json: {e}")))?;
        Self::from_json_value(&value)
    }

    pub fn from_json_value(value: &Value) -> DigitizerResult<Self> {
        let root = value
            .as_object()
            .ok_or_else(|| invalid("project root must be a JSON object"))?;

        let x_axis = axis_range(
            "x",
            req_f64(root, FIELDS.x_min)?,
            req_f64(root, FIELDS.x_max)?,
            opt_bool(root, FIELDS.x_log)?.unwrap_or(false),
        )?;
        let y_axis = axis_range(
            "y",
            req_f64(root, FIELDS.y_min)?,
            req_f64(root, FIELDS.y_max)?,
            opt_bool(root, FIELDS.y_log)?.unwrap_or(false),
        )?;
        let secondary_y_axis = secondary_axis(root)?;

        let datasets = match root.get(FIELDS.datasets) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| dataset_from_json(i, item))
                .collect::<DigitizerResult<Vec<_>>>()?,
            Some(_) => return Err(invalid(format!("`{}` must be an array", FIELDS.datasets))),
        };

        let project = Self {
            title: opt_string(root, FIELDS.title)?.unwrap_or_default(),
            x_label: opt_string(root, FIELDS.x_label)?.unwrap_or_default(),
            y_label: opt_string(root, FIELDS.y_label)?.unwrap_or_default(),
            y2_label: opt_string(root, FIELDS.y2_label)?,
            x_axis,
            y_axis,
            secondary_y_axis,
            datasets,
        };
        debug!(
            datasets = project.datasets.len(),
            secondary_axis = project.secondary_y_axis.is_some(),
            "imported project"
        );
        Ok(project)
    }

    /// Wide CSV of the non-empty datasets, see [`crate::io::table::export_csv`].
    pub fn to_csv(&self) -> DigitizerResult<String> {
        super::table::export_csv(&self.datasets)
    }
}

/// Writes `project` as JSON to `path`.
pub fn save_project(path: &Path, project: &Project, pretty: bool) -> DigitizerResult<()> {
    let text = project.to_json_string(pretty)?;
    let file = File::create(path).map_err(|e| DigitizerError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(text.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| DigitizerError::io(path, e))?;
    debug!(path = %path.display(), bytes = text.len(), "saved project");
    Ok(())
}

/// Reads and parses a project JSON file.
pub fn load_project(path: &Path) -> DigitizerResult<Project> {
    let raw = std::fs::read_to_string(path).map_err(|e| DigitizerError::io(path, e))?;
    Project::from_json_str(&raw)
}

fn dataset_to_json(dataset: &Dataset) -> DigitizerResult<Value> {
    let points = dataset
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if p.is_finite() {
                Ok(Value::Array(vec![Value::from(p.x), Value::from(p.y)]))
            } else {
                Err(invalid(format!(
                    "dataset `{}` point {i} is not finite: {p}",
                    dataset.name()
                )))
            }
        })
        .collect::<DigitizerResult<Vec<_>>>()?;

    let mut object = Map::new();
    object.insert(FIELDS.dataset_name.into(), Value::from(dataset.name()));
    object.insert(FIELDS.dataset_color.into(), Value::from(dataset.color().as_str()));
    object.insert(FIELDS.dataset_visible.into(), Value::from(dataset.is_visible()));
    object.insert(
        FIELDS.dataset_use_secondary_y.into(),
        Value::from(dataset.uses_secondary_y()),
    );
    object.insert(FIELDS.dataset_points.into(), Value::Array(points));
    Ok(Value::Object(object))
}

fn dataset_from_json(index: usize, value: &Value) -> DigitizerResult<Dataset> {
    let object = value
        .as_object()
        .ok_or_else(|| invalid(format!("dataset {index} must be a JSON object")))?;

    let name = opt_string(object, FIELDS.dataset_name)?
        .ok_or_else(|| invalid(format!("dataset {index} is missing `{}`", FIELDS.dataset_name)))?;
    let color_text = opt_string(object, FIELDS.dataset_color)?.ok_or_else(|| {
        invalid(format!("dataset {index} is missing `{}`", FIELDS.dataset_color))
    })?;
    let color = HexColor::parse(&color_text)
        .map_err(|e| invalid(format!("dataset {index} (`{name}`): {e}")))?;

    let raw_points = match object.get(FIELDS.dataset_points) {
        None | Some(Value::Null) => &[][..],
        Some(Value::Array(items)) => items.as_slice(),
        Some(_) => {
            return Err(invalid(format!(
                "dataset {index} (`{name}`): `{}` must be an array",
                FIELDS.dataset_points
            )));
        }
    };
    let points: Vec<Point> = raw_points.iter().filter_map(point_from_json).collect();
    let dropped = raw_points.len() - points.len();
    if dropped > 0 {
        warn!(
            dataset = %name,
            dropped,
            kept = points.len(),
            "dropped point entries without two numeric values"
        );
    }

    Ok(Dataset::with_color(name, color)
        .with_points(points)
        .with_visible(opt_bool(object, FIELDS.dataset_visible)?.unwrap_or(true))
        .with_secondary_y(opt_bool(object, FIELDS.dataset_use_secondary_y)?.unwrap_or(false)))
}

/// `[x, y, ...]` with two leading numbers; anything else is rejected.
fn point_from_json(value: &Value) -> Option<Point> {
    match value.as_array()?.as_slice() {
        [x, y, ..] => Some(Point::new(x.as_f64()?, y.as_f64()?)),
        _ => None,
    }
}

fn secondary_axis(root: &Map<String, Value>) -> DigitizerResult<Option<AxisRange>> {
    let min = opt_f64(root, FIELDS.y2_min)?;
    let max = opt_f64(root, FIELDS.y2_max)?;
    let log = opt_bool(root, FIELDS.y2_log)?;
    match (min, max) {
        (Some(min), Some(max)) => axis_range("y2", min, max, log.unwrap_or(false)).map(Some),
        (None, None) => {
            if log.is_some() {
                warn!("ignoring `{}` without a secondary axis range", FIELDS.y2_log);
            }
            Ok(None)
        }
        _ => Err(invalid(format!(
            "secondary axis needs both `{}` and `{}`",
            FIELDS.y2_min, FIELDS.y2_max
        ))),
    }
}

fn axis_range(axis: &str, min: f64, max: f64, is_log: bool) -> DigitizerResult<AxisRange> {
    AxisRange::new(min, max, AxisScale::from_log_flag(is_log))
        .map_err(|e| invalid(format!("{axis} axis: {e}")))
}

fn opt_string(object: &Map<String, Value>, key: &str) -> DigitizerResult<Option<String>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(format!("`{key}` must be a string"))),
    }
}

fn opt_f64(object: &Map<String, Value>, key: &str) -> DigitizerResult<Option<f64>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| invalid(format!("`{key}` is not representable as f64"))),
        Some(_) => Err(invalid(format!("`{key}` must be a number"))),
    }
}

fn req_f64(object: &Map<String, Value>, key: &str) -> DigitizerResult<f64> {
    opt_f64(object, key)?.ok_or_else(|| invalid(format!("missing required `{key}`")))
}

fn opt_bool(object: &Map<String, Value>, key: &str) -> DigitizerResult<Option<bool>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(invalid(format!("`{key}` must be a boolean"))),
    }
}

fn invalid(message: impl Into<String>) -> DigitizerError {
    DigitizerError::InvalidProject(message.into())
}
