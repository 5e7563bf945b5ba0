//! Authenticated request pipeline for the Atrium console.
//!
//! This crate provides:
//! - `ApiClient`, which attaches the tenant/credential context to every
//!   outbound request and normalizes every response
//! - The `ApiError` taxonomy and the tolerant envelope classifier
//! - The `Navigator` seam used by forced logout and the idle watchdog

mod client;
mod envelope;
mod error;
mod navigate;

pub use client::{ApiClient, DEFAULT_LOGIN_PATH, TENANT_HEADER};
pub use envelope::{classify, codes, normalize, FALLBACK_CODE, FALLBACK_MESSAGE};
pub use error::{ApiError, ApiResult, ErrorEnvelope};
pub use navigate::{login_url, Navigator};
