use std::path::PathBuf;
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that abort a benchmark run.
///
/// There is no partial-result path: anything that prevents the whole corpus
/// from being scanned surfaces as one of these and ends the run.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Invalid keyword: {0}")]
    InvalidKeyword(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SearchError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn invalid_keyword(msg: impl Into<String>) -> Self {
        Self::InvalidKeyword(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn thread_pool(msg: impl Into<String>) -> Self {
        Self::ThreadPool(msg.into())
    }

    /// Maps an IO error on `path` to the most specific variant.
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }
}

impl From<config::ConfigError> for SearchError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for SearchError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Self::thread_pool(err.to_string())
    }
}
