use defscope_api::BoxError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Archive error on {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("Extraction failed for {path}: {source}")]
    Extract {
        path: String,
        #[source]
        source: BoxError,
    },
    #[error("{path} is not valid UTF-8")]
    InvalidUtf8 { path: String },
    #[error("Symbol index used after close")]
    Closed,
}

impl IndexError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IndexError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn archive(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        IndexError::Archive {
            path: path.into(),
            source,
        }
    }

    /// Read and parse failures, as opposed to programmer errors.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, IndexError::Closed)
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;
