//! Serialization boundary: project JSON, wide CSV and file naming.
//!
//! ```text
//!  Calibration + [Dataset] ──► Project ──► JSON text / file
//!                                 │
//!                                 └──────► wide CSV (x, series...)
//! ```

pub mod paths;
pub mod project;
pub mod table;

pub use paths::{default_save_dir, sanitize_filename};
pub use project::{PROJECT_FIELDS_V1, Project, ProjectFields, ProjectMeta, load_project, save_project};
pub use table::{export_csv, save_csv};
