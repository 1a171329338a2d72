use thiserror::Error;

/// Catalog access errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No row for the requested id.
    #[error("no such record: {0}")]
    NotFound(String),

    /// The backing store could not be reached or the query failed.
    ///
    /// Callers must treat this as "unknown", never as "absent": permission
    /// resolution fails closed on it.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    /// Whether this error is a definite lookup miss (as opposed to a
    /// backend failure where the row's existence is unknown).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
