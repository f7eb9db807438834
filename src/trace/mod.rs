//! Color-based automatic curve tracing.
//!
//! ```text
//!  chart image ──► PixelSource ──► AutoTracer::match_columns ──► (column, row)
//!                                          │
//!                       CoordinateTransformer::to_data
//!                                          ▼
//!                                   Vec<Point> (data units)
//! ```

pub mod pixels;
pub mod tracer;

pub use pixels::{PixelSource, RgbBuffer, load_rgba_image};
pub use tracer::{AutoTracer, ColumnMatch, ColumnRange, trace};
