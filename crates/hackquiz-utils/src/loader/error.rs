use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadingError {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    WalkDir(#[from] async_walkdir::Error),
    #[error("Invalid Path: {0}")]
    InvalidPath(PathBuf),
}

impl LoadingError {
    /// True if the requested file or directory does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadingError::IO(error) if error.kind() == std::io::ErrorKind::NotFound)
    }
}
