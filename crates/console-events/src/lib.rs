//! Logout notification bus for the Atrium console.
//!
//! Session termination is initiated from three independent places: the
//! request pipeline (rejected credentials), the idle watchdog, and explicit
//! user action. The bus lets UI components observe "session just ended"
//! without knowing about any of them. Publishing never blocks and never
//! fails; subscribers are passive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Why the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoutReason {
    /// The user asked to sign out.
    UserLogout,
    /// The idle watchdog expired.
    IdleTimeout,
    /// The server rejected the session's credentials.
    Unauthorized,
}

impl LogoutReason {
    /// Stable string form, matching the serialized representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogoutReason::UserLogout => "user_logout",
            LogoutReason::IdleTimeout => "idle_timeout",
            LogoutReason::Unauthorized => "unauthorized",
        }
    }
}

/// Payload delivered to every subscriber when a session ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutEvent {
    /// Which termination path fired.
    pub reason: LogoutReason,
    /// When it fired.
    pub at: DateTime<Utc>,
}

/// Broadcast channel for session termination.
///
/// Cloning shares the underlying channel; any clone may publish or
/// subscribe.
#[derive(Clone)]
pub struct LogoutBus {
    tx: broadcast::Sender<LogoutEvent>,
}

impl LogoutBus {
    /// Create a bus with the given buffer capacity per subscriber.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Create a bus with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(16)
    }

    /// Publish a termination event.
    ///
    /// Never blocks; a send with no live subscribers is not an error.
    pub fn notify(&self, reason: LogoutReason) {
        let event = LogoutEvent {
            reason,
            at: Utc::now(),
        };
        debug!(reason = %reason.as_str(), "Logout event published");
        let _ = self.tx.send(event);
    }

    /// Subscribe to termination events.
    ///
    /// The receiver only sees events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<LogoutEvent> {
        self.tx.subscribe()
    }
}

impl Default for LogoutBus {
    fn default() -> Self {
        Self::new()
    }
}
