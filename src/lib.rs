//! chart-digitizer: recover numeric series from raster chart images.
//!
//! The crate covers the geometry and data layer of a plot digitizer:
//! calibrating pixel anchors against linear/log axis ranges (with an optional
//! secondary Y axis), tracing curves by color, and exporting the result as a
//! project JSON document or a wide CSV table. Windowing and pointer handling
//! are left to the embedding application.

pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod telemetry;
pub mod trace;

pub use crate::config::DigitizerConfig;
pub use crate::core::{Calibration, CoordinateTransformer, Dataset, Point};
pub use crate::error::{DigitizerError, DigitizerResult};
pub use crate::io::Project;
pub use crate::trace::AutoTracer;
