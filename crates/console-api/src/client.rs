//! Authenticated request pipeline.
//!
//! Every outbound call goes through `ApiClient`: it attaches the current
//! tenant/credential context from the session store, decodes responses
//! tolerantly, and normalizes every non-2xx response into an `ApiError`.
//! When the server rejects the session's token, the pipeline owns the
//! termination: clear the store, publish on the logout bus, send the user
//! to the login entry point with their intended path.

use crate::envelope;
use crate::error::{ApiError, ApiResult, ErrorEnvelope};
use crate::navigate::{login_url, Navigator};
use console_events::{LogoutBus, LogoutReason};
use console_storage::SessionStore;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Header carrying the tenant scope.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Default login entry point path.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Authenticated HTTP client for the dashboard API.
#[derive(Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: String,
    login_path: String,
    store: Arc<SessionStore>,
    bus: LogoutBus,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a client for the given API base URL.
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<SessionStore>,
        bus: LogoutBus,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            store,
            bus,
            navigator,
        }
    }

    /// Override the login entry point path.
    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Perform an authenticated request, returning the decoded payload.
    ///
    /// JSON bodies carry `Content-Type: application/json`; requests
    /// without a body carry no content type.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ApiResult<Value> {
        let mut request = self.http_client.request(method, self.api_url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.dispatch(request, true).await
    }

    /// Perform a request without any session context.
    ///
    /// For calls made before a session exists (login itself, password
    /// reset). Decoding and error classification behave exactly as for
    /// authenticated requests.
    pub async fn execute_public(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ApiResult<Value> {
        let mut request = self.http_client.request(method, self.api_url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.dispatch(request, false).await
    }

    /// Run a caller-built request through the pipeline.
    ///
    /// The variant entry point for bodies that must not carry the JSON
    /// content type (multipart uploads): the caller builds the request,
    /// the pipeline contributes only the session headers plus the usual
    /// decoding and classification.
    pub async fn execute_prepared(
        &self,
        request: RequestBuilder,
        attach_session: bool,
    ) -> ApiResult<Value> {
        self.dispatch(request, attach_session).await
    }

    /// Build a request against the API base URL for `execute_prepared`.
    pub fn request_builder(&self, method: Method, path: &str) -> RequestBuilder {
        self.http_client.request(method, self.api_url(path))
    }

    async fn dispatch(&self, mut request: RequestBuilder, attach_session: bool) -> ApiResult<Value> {
        if attach_session {
            if let Some(tenant_id) = self.store.tenant_id()? {
                request = request.header(TENANT_HEADER, tenant_id);
            }
            if let Some(token) = self.store.access_token()? {
                request = request.header(
                    reqwest::header::AUTHORIZATION,
                    format!("Bearer {}", token),
                );
            }
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        // A body that is not JSON degrades to its raw text; classification
        // below accepts any body the server produces.
        let payload = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

        if status.is_success() {
            return Ok(payload);
        }

        let error = envelope::classify(status.as_u16(), payload);
        debug!(status = %status, code = ?error.code(), "Request rejected");

        if let ApiError::UnauthorizedToken(envelope) = &error {
            // Exactly once per offending response
            self.force_logout(envelope);
        }

        Err(error)
    }

    /// Terminate the session after an authority-rejected-credential
    /// response: clear the store, broadcast, and navigate to login with
    /// the originally intended path.
    fn force_logout(&self, envelope: &ErrorEnvelope) {
        warn!(code = %envelope.code, "Server rejected session credentials, forcing logout");

        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear session during forced logout");
        }
        self.bus.notify(LogoutReason::Unauthorized);

        let next = self.navigator.current_path();
        let target = login_url(
            &self.login_path,
            Some(next.as_str()).filter(|p| !p.is_empty()),
        );
        self.navigator.assign(&target);
    }

    fn decode<T: DeserializeOwned>(payload: Value) -> ApiResult<T> {
        serde_json::from_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn encode<B: Serialize + ?Sized>(body: &B) -> ApiResult<Value> {
        serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// GET returning a typed payload.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        Self::decode(self.execute(Method::GET, path, None).await?)
    }

    /// POST a JSON body, returning a typed payload.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = Self::encode(body)?;
        Self::decode(self.execute(Method::POST, path, Some(&body)).await?)
    }

    /// PUT a JSON body, returning a typed payload.
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = Self::encode(body)?;
        Self::decode(self.execute(Method::PUT, path, Some(&body)).await?)
    }

    /// DELETE returning a typed payload.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        Self::decode(self.execute(Method::DELETE, path, None).await?)
    }

    /// POST without session context, returning a typed payload.
    pub async fn post_public<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = Self::encode(body)?;
        Self::decode(self.execute_public(Method::POST, path, Some(&body)).await?)
    }
}
