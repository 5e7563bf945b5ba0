//! Request pipeline error types.

use serde_json::Value;
use thiserror::Error;

/// Normalized server rejection.
///
/// Whatever envelope shape the server used, a non-2xx response is reduced
/// to this one value before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    /// Machine-readable code (`"API_ERROR"` when the server sent none)
    pub code: String,
    /// Human-readable message (`"Request failed"` when the server sent none)
    pub message: String,
    /// HTTP status of the response
    pub status: u16,
    /// The decoded body, or the raw text when it was not JSON
    pub raw_body: Value,
}

/// Error type raised by the request pipeline.
///
/// Callers decide user messaging; only `UnauthorizedToken` has
/// pipeline-owned side effects (session clear + redirect to login).
#[derive(Error, Debug)]
pub enum ApiError {
    /// Fetch-level failure, surfaced as-is
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Rejected login credentials; counted by the attempt limiter,
    /// never forces logout
    #[error("Invalid credentials: {}", .0.message)]
    InvalidCredentials(ErrorEnvelope),

    /// The server no longer accepts the session's token; always forces
    /// logout, regardless of call site
    #[error("Unauthorized: {}", .0.message)]
    UnauthorizedToken(ErrorEnvelope),

    /// The tenant is suspended; reported to the user, never counted,
    /// never forces logout
    #[error("Tenant suspended: {}", .0.message)]
    TenantSuspended(ErrorEnvelope),

    /// The operation requires super-admin rights
    #[error("Super admin required: {}", .0.message)]
    SuperAdminRequired(ErrorEnvelope),

    /// Any other non-2xx response
    #[error("API error {} ({}): {}", .0.code, .0.status, .0.message)]
    Api(ErrorEnvelope),

    /// A 2xx payload did not match the caller's expected shape
    #[error("Response decode error: {0}")]
    Decode(String),

    /// Session store access failed
    #[error("Storage error: {0}")]
    Storage(#[from] console_storage::StorageError),
}

impl ApiError {
    /// The normalized envelope, for every classified server rejection.
    pub fn envelope(&self) -> Option<&ErrorEnvelope> {
        match self {
            ApiError::InvalidCredentials(e)
            | ApiError::UnauthorizedToken(e)
            | ApiError::TenantSuspended(e)
            | ApiError::SuperAdminRequired(e)
            | ApiError::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Machine-readable code of the server rejection, if any.
    pub fn code(&self) -> Option<&str> {
        self.envelope().map(|e| e.code.as_str())
    }

    /// HTTP status of the server rejection, if any.
    pub fn http_status(&self) -> Option<u16> {
        self.envelope().map(|e| e.status)
    }

    /// Whether this error terminated the session.
    pub fn forces_logout(&self) -> bool {
        matches!(self, ApiError::UnauthorizedToken(_))
    }
}

/// Result type alias using ApiError.
pub type ApiResult<T> = Result<T, ApiError>;
