//! Login flow and explicit logout.

use crate::config::AuthConfig;
use console_api::{login_url, ApiClient, ApiResult, Navigator};
use console_events::{LogoutBus, LogoutReason};
use console_storage::{Session, SessionStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Path of the login operation on the dashboard API.
const LOGIN_ENDPOINT: &str = "/v1/auth/login";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    tenant: &'a str,
    email: &'a str,
    password: &'a str,
}

/// Successful login payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub tenant_id: String,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: LoginUser,
    #[serde(default)]
    pub subscription: Option<LoginSubscription>,
}

/// Profile snapshot from the login payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: String,
    pub name: String,
    pub role: String,
    pub email: String,
    #[serde(default)]
    pub is_super_admin: bool,
}

/// Subscription snapshot from the login payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSubscription {
    pub status: String,
    pub current_period_end_at: String,
    #[serde(default)]
    pub days_to_expiry: Option<i64>,
}

/// Authentication status for UI shells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    /// A session is present.
    LoggedIn {
        tenant_id: String,
        user_id: String,
        user_name: String,
    },
    /// No session.
    NotLoggedIn,
}

/// Owns the login flow.
///
/// The only writer of the session store outside the termination paths:
/// a session is created whole from the login response and never partially
/// updated afterwards.
pub struct SessionManager {
    client: ApiClient,
    store: Arc<SessionStore>,
    bus: LogoutBus,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl SessionManager {
    /// Create a session manager.
    pub fn new(
        client: ApiClient,
        store: Arc<SessionStore>,
        bus: LogoutBus,
        navigator: Arc<dyn Navigator>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            client,
            store,
            bus,
            navigator,
            login_path: config.login_path.clone(),
        }
    }

    /// Authenticate against the dashboard API and persist the session.
    ///
    /// Goes through the pipeline's public entry point: no session headers
    /// are attached, and a rejection comes back classified (the login view
    /// feeds `InvalidCredentials` into its attempt limiter).
    pub async fn login(&self, tenant: &str, email: &str, password: &str) -> ApiResult<Session> {
        let response: LoginResponse = self
            .client
            .post_public(
                LOGIN_ENDPOINT,
                &LoginRequest {
                    tenant,
                    email,
                    password,
                },
            )
            .await?;

        let (status, period_end, days_to_expiry) = match response.subscription {
            Some(subscription) => (
                subscription.status,
                subscription.current_period_end_at,
                subscription.days_to_expiry,
            ),
            None => (String::new(), String::new(), None),
        };

        let session = Session {
            tenant_id: response.tenant_id,
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            user_id: response.user.id,
            user_name: response.user.name,
            user_role: response.user.role,
            user_email: response.user.email,
            is_super_admin: response.user.is_super_admin,
            subscription_status: status,
            subscription_current_period_end_at: period_end,
            subscription_days_to_expiry: days_to_expiry,
        };
        self.store.set(&session)?;

        info!(tenant_id = %session.tenant_id, user_id = %session.user_id, "Login successful");
        Ok(session)
    }

    /// Explicit user-initiated logout.
    ///
    /// Clears the store, broadcasts, and navigates to the login entry
    /// point. Purely client-side; there is no server-side session to
    /// revoke.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear session on logout");
        }
        self.bus.notify(LogoutReason::UserLogout);
        self.navigator.assign(&login_url(&self.login_path, None));
        info!("Logged out");
    }

    /// Current authentication status.
    pub fn status(&self) -> AuthStatus {
        match self.store.get() {
            Ok(Some(session)) => AuthStatus::LoggedIn {
                tenant_id: session.tenant_id,
                user_id: session.user_id,
                user_name: session.user_name,
            },
            Ok(None) => AuthStatus::NotLoggedIn,
            Err(e) => {
                warn!(error = %e, "Could not read session store");
                AuthStatus::NotLoggedIn
            }
        }
    }
}
