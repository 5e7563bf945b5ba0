//! High-level API for the persisted session context.

use crate::{KeyValueStore, SessionKeys, StorageResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The authenticated context held by the client.
///
/// A session is either fully present (tenant + access token set) or fully
/// absent; the profile and subscription fields are display snapshots taken
/// from the login response, not authoritative data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque tenant identifier scoping every API call
    pub tenant_id: String,
    /// Bearer access token
    pub access_token: String,
    /// Refresh token, when the server issued one
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// User identifier
    pub user_id: String,
    /// Display name
    pub user_name: String,
    /// Role within the tenant
    pub user_role: String,
    /// Email address
    pub user_email: String,
    /// Super-admin flag
    pub is_super_admin: bool,
    /// Subscription status snapshot (advisory)
    pub subscription_status: String,
    /// Subscription period end, RFC 3339 (advisory)
    pub subscription_current_period_end_at: String,
    /// Days to subscription expiry, if the server computed one
    #[serde(default)]
    pub subscription_days_to_expiry: Option<i64>,
}

/// High-level store for the current session.
///
/// Only the login flow writes a session; only the termination paths
/// (explicit logout, idle expiry, forced logout) clear it. Everything else
/// reads.
pub struct SessionStore {
    storage: Box<dyn KeyValueStore>,
}

impl SessionStore {
    /// Create a session store over the given backend.
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Persist a complete session, replacing any previous one.
    pub fn set(&self, session: &Session) -> StorageResult<()> {
        self.storage.set(SessionKeys::TENANT_ID, &session.tenant_id)?;
        self.storage
            .set(SessionKeys::ACCESS_TOKEN, &session.access_token)?;
        match &session.refresh_token {
            Some(token) => self.storage.set(SessionKeys::REFRESH_TOKEN, token)?,
            None => {
                let _ = self.storage.delete(SessionKeys::REFRESH_TOKEN)?;
            }
        }
        self.storage.set(SessionKeys::USER_ID, &session.user_id)?;
        self.storage.set(SessionKeys::USER_NAME, &session.user_name)?;
        self.storage.set(SessionKeys::USER_ROLE, &session.user_role)?;
        self.storage
            .set(SessionKeys::USER_EMAIL, &session.user_email)?;
        self.storage.set(
            SessionKeys::IS_SUPER_ADMIN,
            if session.is_super_admin { "true" } else { "false" },
        )?;
        self.storage.set(
            SessionKeys::SUBSCRIPTION_STATUS,
            &session.subscription_status,
        )?;
        self.storage.set(
            SessionKeys::SUBSCRIPTION_CURRENT_PERIOD_END_AT,
            &session.subscription_current_period_end_at,
        )?;
        match session.subscription_days_to_expiry {
            Some(days) => self
                .storage
                .set(SessionKeys::SUBSCRIPTION_DAYS_TO_EXPIRY, &days.to_string())?,
            None => {
                let _ = self.storage.delete(SessionKeys::SUBSCRIPTION_DAYS_TO_EXPIRY)?;
            }
        }

        debug!(tenant_id = %session.tenant_id, user_id = %session.user_id, "Session stored");
        Ok(())
    }

    /// Read the current session.
    ///
    /// Returns `None` unless both the tenant id and the access token are
    /// present and non-empty; a partially written session is treated as
    /// absent.
    pub fn get(&self) -> StorageResult<Option<Session>> {
        let tenant_id = match self.storage.get(SessionKeys::TENANT_ID)? {
            Some(v) if !v.is_empty() => v,
            _ => return Ok(None),
        };
        let access_token = match self.storage.get(SessionKeys::ACCESS_TOKEN)? {
            Some(v) if !v.is_empty() => v,
            _ => return Ok(None),
        };

        Ok(Some(Session {
            tenant_id,
            access_token,
            refresh_token: self.storage.get(SessionKeys::REFRESH_TOKEN)?,
            user_id: self.storage.get(SessionKeys::USER_ID)?.unwrap_or_default(),
            user_name: self
                .storage
                .get(SessionKeys::USER_NAME)?
                .unwrap_or_default(),
            user_role: self
                .storage
                .get(SessionKeys::USER_ROLE)?
                .unwrap_or_default(),
            user_email: self
                .storage
                .get(SessionKeys::USER_EMAIL)?
                .unwrap_or_default(),
            is_super_admin: self
                .storage
                .get(SessionKeys::IS_SUPER_ADMIN)?
                .map(|v| v == "true")
                .unwrap_or(false),
            subscription_status: self
                .storage
                .get(SessionKeys::SUBSCRIPTION_STATUS)?
                .unwrap_or_default(),
            subscription_current_period_end_at: self
                .storage
                .get(SessionKeys::SUBSCRIPTION_CURRENT_PERIOD_END_AT)?
                .unwrap_or_default(),
            subscription_days_to_expiry: self
                .storage
                .get(SessionKeys::SUBSCRIPTION_DAYS_TO_EXPIRY)?
                .and_then(|v| v.parse().ok()),
        }))
    }

    /// Check whether a session is present.
    pub fn has_session(&self) -> StorageResult<bool> {
        Ok(self.get()?.is_some())
    }

    /// Current tenant id, if a non-empty one is stored.
    pub fn tenant_id(&self) -> StorageResult<Option<String>> {
        Ok(self
            .storage
            .get(SessionKeys::TENANT_ID)?
            .filter(|v| !v.is_empty()))
    }

    /// Current access token, if a non-empty one is stored.
    pub fn access_token(&self) -> StorageResult<Option<String>> {
        Ok(self
            .storage
            .get(SessionKeys::ACCESS_TOKEN)?
            .filter(|v| !v.is_empty()))
    }

    /// Remove every session key.
    ///
    /// Idempotent: clearing an already-empty store succeeds and has no
    /// side effects. Delete failures on individual keys are ignored so a
    /// second termination path always observes an empty store.
    pub fn clear(&self) -> StorageResult<()> {
        for key in SessionKeys::ALL {
            let _ = self.storage.delete(key);
        }
        debug!("Session cleared");
        Ok(())
    }
}
