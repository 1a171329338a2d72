use thiserror::Error;

/// Filesystem seam errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// The path does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl FsError {
    /// Classify a raw I/O error, turning `ErrorKind::NotFound` into the
    /// typed miss so conflict checks can rely on it.
    #[must_use]
    pub fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.display().to_string())
        } else {
            Self::Io(err)
        }
    }

    /// Whether this is a definite miss.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for filesystem operations.
pub type FsResult<T> = Result<T, FsError>;
