use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the search index.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    /// A document handed to `fit` lacks one of the configured text fields
    #[error("document at position {position} is missing text field '{field}'")]
    MissingField { position: usize, field: String },

    #[error("index has not been fitted")]
    NotFitted,
}

/// Errors raised while walking a document tree.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("root path not found: {0}")]
    RootNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while fetching remote content.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("archive did not contain expected directory: {0}")]
    MissingRoot(PathBuf),
}
