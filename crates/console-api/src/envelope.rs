//! Tolerant error-envelope normalization.
//!
//! Upstream services do not agree on one envelope shape, so every non-2xx
//! body is accepted as `{error: {code, message}}`, `{code, message}`, or an
//! unstructured string. That tolerance lives entirely in this module; the
//! rest of the pipeline only sees the `ApiError` taxonomy.

use crate::error::{ApiError, ErrorEnvelope};
use serde_json::Value;

/// Code used when the server sent none.
pub const FALLBACK_CODE: &str = "API_ERROR";
/// Message used when the server sent none.
pub const FALLBACK_MESSAGE: &str = "Request failed";

/// Error codes the classifier gives special meaning to.
pub mod codes {
    /// Authority rejected the session token.
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    /// Authority rejected the session token as expired.
    pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
    /// Login credentials were wrong.
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    /// The tenant is suspended.
    pub const TENANT_SUSPENDED: &str = "TENANT_SUSPENDED";
    /// The operation needs super-admin rights.
    pub const SUPER_ADMIN_REQUIRED: &str = "SUPER_ADMIN_REQUIRED";
}

/// Message fragments that mark a 401 as a token rejection even when the
/// code is missing. Legacy upstream bodies carry prose instead of codes;
/// the substring match keeps them on the forced-logout path.
const TOKEN_REJECTION_FRAGMENTS: [&str; 3] = ["unauthorized", "invalid token", "expired token"];

fn field_str(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Reduce a decoded response body to one `ErrorEnvelope`.
///
/// Shape priority: nested `error.code`/`error.message`, then top-level
/// `code`/`message`, then the body itself when it is a bare string, then
/// the generic fallback.
pub fn normalize(status: u16, body: Value) -> ErrorEnvelope {
    let (code, message) = match &body {
        Value::Object(_) => {
            let nested = body.get("error");
            let code = nested
                .and_then(|e| field_str(e, "code"))
                .or_else(|| field_str(&body, "code"));
            let message = nested
                .and_then(|e| field_str(e, "message"))
                .or_else(|| field_str(&body, "message"));
            (code, message)
        }
        Value::String(text) if !text.trim().is_empty() => (None, Some(text.trim().to_string())),
        _ => (None, None),
    };

    ErrorEnvelope {
        code: code.unwrap_or_else(|| FALLBACK_CODE.to_string()),
        message: message.unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
        status,
        raw_body: body,
    }
}

/// Whether a 401 envelope is an authority-rejected-token signal.
///
/// Distinct codes (invalid credentials, suspended tenant, missing
/// super-admin rights) are checked before this ever runs, so the substring
/// fallback cannot reclassify them.
fn is_token_rejection(envelope: &ErrorEnvelope) -> bool {
    if envelope.code == codes::UNAUTHORIZED || envelope.code == codes::TOKEN_EXPIRED {
        return true;
    }
    let message = envelope.message.to_lowercase();
    TOKEN_REJECTION_FRAGMENTS
        .iter()
        .any(|fragment| message.contains(fragment))
}

/// Classify a non-2xx response into the error taxonomy.
pub fn classify(status: u16, body: Value) -> ApiError {
    let envelope = normalize(status, body);

    match envelope.code.as_str() {
        codes::INVALID_CREDENTIALS => ApiError::InvalidCredentials(envelope),
        codes::TENANT_SUSPENDED => ApiError::TenantSuspended(envelope),
        codes::SUPER_ADMIN_REQUIRED => ApiError::SuperAdminRequired(envelope),
        _ if status == 401 && is_token_rejection(&envelope) => {
            ApiError::UnauthorizedToken(envelope)
        }
        _ => ApiError::Api(envelope),
    }
}
