use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::color::{ColorMetric, DEFAULT_PALETTE, HexColor};
use crate::core::dataset::Dataset;
use crate::error::{DigitizerError, DigitizerResult};

/// Auto-trace tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceConfig {
    #[serde(default)]
    pub color_metric: ColorMetric,
    /// Scan every Nth column; 1 scans all of them.
    #[serde(default = "default_column_step")]
    pub column_step: u32,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            color_metric: ColorMetric::default(),
            column_step: default_column_step(),
        }
    }
}

/// Export/save tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,
    /// Prefix of the timestamped file name used when the title sanitizes to nothing.
    #[serde(default = "default_basename")]
    pub default_basename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pretty_json: default_pretty_json(),
            default_basename: default_basename(),
        }
    }
}

/// Top-level configuration.
///
/// Every field has a default so a partial JSON file (or `{}`) is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitizerConfig {
    #[serde(default)]
    pub trace: TraceConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
    #[serde(default = "default_max_datasets")]
    pub max_datasets: usize,
}

impl Default for DigitizerConfig {
    fn default() -> Self {
        Self {
            trace: TraceConfig::default(),
            export: ExportConfig::default(),
            palette: default_palette(),
            max_datasets: default_max_datasets(),
        }
    }
}

impl DigitizerConfig {
    pub fn from_json_str(input: &str) -> DigitizerResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| DigitizerError::InvalidData(format!("failed to parse config: {e}")))?;
        config.validate()
    }

    pub fn load(path: &Path) -> DigitizerResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| DigitizerError::io(path, e))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(self) -> DigitizerResult<Self> {
        if self.trace.column_step == 0 {
            return Err(DigitizerError::InvalidData(
                "trace column step must be >= 1".to_owned(),
            ));
        }
        if self.max_datasets == 0 {
            return Err(DigitizerError::InvalidData(
                "max datasets must be >= 1".to_owned(),
            ));
        }
        if self.palette.is_empty() {
            return Err(DigitizerError::InvalidData(
                "palette must contain at least one color".to_owned(),
            ));
        }
        for color in &self.palette {
            HexColor::parse(color)?;
        }
        if self.export.default_basename.trim().is_empty() {
            return Err(DigitizerError::InvalidData(
                "default export basename must not be empty".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Palette color for the `index`-th dataset, cycling through the palette.
    pub fn palette_color(&self, index: usize) -> DigitizerResult<HexColor> {
        match self.palette.get(index % self.palette.len().max(1)) {
            Some(text) => HexColor::parse(text),
            None => Err(DigitizerError::InvalidData("palette is empty".to_owned())),
        }
    }

    /// Creates the dataset that would follow `existing`, colored by the next
    /// palette slot. Fails once `max_datasets` is reached.
    pub fn next_dataset(
        &self,
        existing: &[Dataset],
        name: impl Into<String>,
    ) -> DigitizerResult<Dataset> {
        if existing.len() >= self.max_datasets {
            return Err(DigitizerError::InvalidData(format!(
                "dataset limit reached ({} of {})",
                existing.len(),
                self.max_datasets
            )));
        }
        let color = self.palette_color(existing.len())?;
        Ok(Dataset::with_color(name, color))
    }
}

fn default_column_step() -> u32 {
    1
}

fn default_pretty_json() -> bool {
    true
}

fn default_basename() -> String {
    "chart_digitizer_export".to_owned()
}

fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|c| (*c).to_owned()).collect()
}

fn default_max_datasets() -> usize {
    6
}
