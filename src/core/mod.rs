pub mod axis;
pub mod calibration;
pub mod color;
pub mod dataset;
pub mod snap;
pub mod transform;
pub mod types;

pub use axis::{AxisRange, AxisScale};
pub use calibration::{AnchorKind, Calibration, CalibrationAnchors};
pub use color::{ColorMetric, DEFAULT_PALETTE, HexColor, Rgb, palette_color};
pub use dataset::Dataset;
pub use snap::XSnapper;
pub use transform::CoordinateTransformer;
pub use types::{CanvasPoint, Point};
