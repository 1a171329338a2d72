//! Uniform response envelope: `{code, data, msg}`.
//!
//! The HTTP layer is out of scope here, but every surface of the gateway
//! answers in this shape, so the envelope and its error-code space live
//! with the core. Internal failures are reported with a generic message;
//! real paths and backend errors never leak to clients.

use serde::{Deserialize, Serialize};
use spacedav_core::GatewayError;

/// Application error codes carried in the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCode(pub u32);

impl ErrorCode {
    /// Success.
    pub const OK: Self = Self(0);
    /// Malformed request or path.
    pub const INVALID_REQUEST: Self = Self(40_001);
    /// Token expired.
    pub const TOKEN_EXPIRED: Self = Self(40_101);
    /// Referenced user does not exist.
    pub const USER_NOT_FOUND: Self = Self(40_102);
    /// Token invalid.
    pub const INVALID_TOKEN: Self = Self(40_103);
    /// Caller's role does not permit the operation.
    pub const INVALID_ROLE: Self = Self(40_301);
    /// Unclassified failure; message is shown verbatim.
    pub const NOT_SPECIFIED: Self = Self(99_999);
}

/// The `{code, data, msg}` envelope every endpoint answers with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Application error code; [`ErrorCode::OK`] on success.
    pub code: ErrorCode,
    /// Payload, if any.
    pub data: Option<T>,
    /// Human-readable message; empty on success.
    pub msg: String,
}

impl<T> Envelope<T> {
    /// Successful envelope carrying `data`.
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            code: ErrorCode::OK,
            data: Some(data),
            msg: String::new(),
        }
    }

    /// Error envelope with an explicit code and message.
    #[must_use]
    pub fn error(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self {
            code,
            data: None,
            msg: msg.into(),
        }
    }

    /// Map a gateway error to its envelope, hiding internal detail.
    #[must_use]
    pub fn from_error(err: &GatewayError) -> Self {
        match err {
            GatewayError::PermissionDenied(msg) => Self::error(ErrorCode::INVALID_ROLE, msg.clone()),
            GatewayError::InvalidPath(msg) => Self::error(ErrorCode::INVALID_REQUEST, msg.clone()),
            GatewayError::Conflict(what) => Self::error(
                ErrorCode::NOT_SPECIFIED,
                format!("destination already exists: {what}"),
            ),
            GatewayError::NotFound { kind, .. } => {
                Self::error(ErrorCode::NOT_SPECIFIED, format!("{kind} not found"))
            },
            // Storage/filesystem detail stays server-side.
            GatewayError::RenamedButNotRecorded { .. }
            | GatewayError::Catalog(_)
            | GatewayError::Fs(_) => Self::error(ErrorCode::NOT_SPECIFIED, "internal error"),
        }
    }
}

/// The HTTP status class a gateway error maps to.
#[must_use]
pub fn http_status(err: &GatewayError) -> u16 {
    match err {
        GatewayError::PermissionDenied(_) => 401,
        GatewayError::InvalidPath(_) => 400,
        GatewayError::NotFound { .. } => 404,
        GatewayError::Conflict(_) => 409,
        GatewayError::RenamedButNotRecorded { .. }
        | GatewayError::Catalog(_)
        | GatewayError::Fs(_) => 500,
    }
}
