//! Driver error types
//!
//! The analysis core cannot fail; everything here comes from I/O around it:
//! cloning, walking, configuration and result files.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("Invalid repository URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to clone {url}: {source}")]
    Clone {
        url: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Invalid exclude pattern: {0}")]
    Pattern(#[from] ignore::Error),

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Malformed record: {0}")]
    Record(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SurveyResult<T> = Result<T, SurveyError>;
