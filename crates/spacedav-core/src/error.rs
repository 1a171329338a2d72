use thiserror::Error;

/// What kind of record a `NotFound` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
    /// No user row for the claimed id.
    User,
    /// No account row for the claimed id.
    Account,
    /// No dataset row for the requested id.
    Dataset,
    /// A filesystem path that was expected to exist.
    Path,
}

impl std::fmt::Display for NotFoundKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::User => "user",
            Self::Account => "account",
            Self::Dataset => "dataset",
            Self::Path => "path",
        };
        f.write_str(s)
    }
}

/// Error taxonomy shared by the resolver, redirector, relocation
/// coordinator and gateway front.
///
/// The resolver and redirector fail closed: lookup misses and backend
/// failures surface as `PermissionDenied`/`NotFound`, never as a
/// permissive default.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The resolver said `NotAllowed`, or the method is not permitted
    /// under the effective permission.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Unknown user/account/dataset id, or a stat miss.
    #[error("{kind} not found: {what}")]
    NotFound {
        /// Which record class was missing.
        kind: NotFoundKind,
        /// Identifier or path that failed to resolve.
        what: String,
    },

    /// Malformed virtual path, unknown namespace selector, or an empty
    /// target where one is required.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Destination exists and overwrite was not requested.
    #[error("destination already exists: {0}")]
    Conflict(String),

    /// The filesystem rename succeeded but the dataset record update did
    /// not. The filesystem is authoritative for the new location; the
    /// record must be reconciled by retrying the update.
    #[error("dataset {id} renamed to {dest} but record update failed: {source}")]
    RenamedButNotRecorded {
        /// The dataset whose record is stale.
        id: u64,
        /// Where the bytes now live.
        dest: String,
        /// The record-update failure.
        #[source]
        source: Box<GatewayError>,
    },

    /// Catalog failure not classified above.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Filesystem failure not classified above.
    #[error("filesystem error: {0}")]
    Fs(#[from] std::io::Error),
}

impl GatewayError {
    /// Convenience constructor for `NotFound`.
    #[must_use]
    pub fn not_found(kind: NotFoundKind, what: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            what: what.into(),
        }
    }

    /// Convenience constructor for `PermissionDenied`.
    #[must_use]
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied(reason.into())
    }
}

/// Result alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = GatewayError::not_found(NotFoundKind::Account, "account:9");
        assert_eq!(err.to_string(), "account not found: account:9");

        let err = GatewayError::RenamedButNotRecorded {
            id: 42,
            dest: "/spaces/dataset/42/weights.bin".to_owned(),
            source: Box::new(GatewayError::Catalog("connection reset".to_owned())),
        };
        assert!(err.to_string().contains("renamed to"));
        assert!(err.to_string().contains("record update failed"));
    }
}
