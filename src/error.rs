use std::path::PathBuf;

use thiserror::Error;

pub type MetaResult<T> = Result<T, MetaError>;

/// Everything that can abort a single annotation load.
///
/// None of these are retried: a failed load returns no records at all.
#[derive(Debug, Error)]
pub enum MetaError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error at {path}: {msg}")]
    Parse { path: PathBuf, msg: String },

    #[error("validation failed at {path}, row {row}: {msg}")]
    Validation {
        path: PathBuf,
        row: usize,
        msg: String,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl MetaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MetaError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        MetaError::Parse {
            path: path.into(),
            msg: msg.into(),
        }
    }
}
