use std::path::PathBuf;

use thiserror::Error;

pub type DigitizerResult<T> = Result<T, DigitizerError>;

#[derive(Debug, Error)]
pub enum DigitizerError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("invalid project: {0}")]
    InvalidProject(String),

    #[error("calibration is incomplete: all four axis anchors must be set")]
    Uncalibrated,

    #[error("i/o error on `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image error: {0}")]
    Image(String),

    #[error("csv error: {0}")]
    Csv(String),
}

impl DigitizerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
