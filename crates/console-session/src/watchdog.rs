//! Idle timeout watchdog.
//!
//! A watchdog instance is mounted alongside a protected view and owns a
//! single countdown. Any user-activity signal restarts the countdown;
//! letting it elapse terminates the session. The instance is an explicitly
//! constructed, explicitly disposed resource: `unmount` (or Drop) cancels
//! the timer on every exit path, so no stale timer can fire against a
//! torn-down view.

use crate::config::AuthConfig;
use crate::idle_fsm::{IdleMachine, IdleMachineInput, IdleState};
use console_api::{login_url, Navigator};
use console_events::{LogoutBus, LogoutReason};
use console_storage::SessionStore;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// User-activity signals that restart the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivitySignal {
    PointerMove,
    PointerDown,
    KeyDown,
    TouchStart,
    Scroll,
    Click,
}

/// Callback for the user-visible notice shown when the session expires.
pub type ExpiryNotice = Box<dyn Fn() + Send + Sync>;

/// Inactivity watchdog for one mounted protected view.
pub struct IdleWatchdog {
    inner: Arc<WatchdogInner>,
}

struct WatchdogInner {
    store: Arc<SessionStore>,
    bus: LogoutBus,
    navigator: Arc<dyn Navigator>,
    idle_timeout: Duration,
    login_path: String,
    machine: Mutex<IdleMachine>,
    /// At most one countdown task exists at any time.
    timer: Mutex<Option<JoinHandle<()>>>,
    notice: Mutex<Option<ExpiryNotice>>,
}

impl IdleWatchdog {
    /// Mount a watchdog over a protected view.
    ///
    /// With no session present there is nothing to protect: the watchdog
    /// stays inactive and never arms.
    pub fn mount(
        store: Arc<SessionStore>,
        bus: LogoutBus,
        navigator: Arc<dyn Navigator>,
        config: &AuthConfig,
    ) -> Self {
        let inner = Arc::new(WatchdogInner {
            store,
            bus,
            navigator,
            idle_timeout: config.idle_timeout,
            login_path: config.login_path.clone(),
            machine: Mutex::new(IdleMachine::new()),
            timer: Mutex::new(None),
            notice: Mutex::new(None),
        });

        let has_session = inner.store.has_session().unwrap_or_else(|e| {
            warn!(error = %e, "Could not read session store on mount");
            false
        });

        if has_session {
            let _ = inner.machine.lock().unwrap().consume(&IdleMachineInput::Arm);
            WatchdogInner::start_timer(&inner);
            debug!(timeout_secs = inner.idle_timeout.as_secs(), "Idle watchdog armed");
        } else {
            debug!("No session on mount, idle watchdog inactive");
        }

        Self { inner }
    }

    /// Register the user-visible notice invoked on expiry.
    pub fn set_expiry_notice(&self, notice: ExpiryNotice) {
        *self.inner.notice.lock().unwrap() = Some(notice);
    }

    /// Record a user-activity signal.
    ///
    /// While armed this cancels the outstanding countdown and starts a
    /// fresh one. Signals while inactive or after expiry are ignored:
    /// expiry is sticky for the lifetime of this mount.
    pub fn record_activity(&self, signal: ActivitySignal) {
        {
            let mut machine = self.inner.machine.lock().unwrap();
            if machine.consume(&IdleMachineInput::Activity).is_err() {
                debug!(signal = ?signal, "Activity ignored outside armed state");
                return;
            }
        }
        WatchdogInner::start_timer(&self.inner);
    }

    /// Current lifecycle state.
    pub fn state(&self) -> IdleState {
        IdleState::from(self.inner.machine.lock().unwrap().state())
    }

    /// Cancel the countdown and release listeners.
    ///
    /// Runs on every exit path (Drop calls it) and is safe to call
    /// repeatedly or from any state.
    pub fn unmount(&self) {
        let _ = self
            .inner
            .machine
            .lock()
            .unwrap()
            .consume(&IdleMachineInput::Disarm);
        if let Some(timer) = self.inner.timer.lock().unwrap().take() {
            timer.abort();
        }
    }
}

impl Drop for IdleWatchdog {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl WatchdogInner {
    /// Start a fresh countdown, cancelling any outstanding one.
    fn start_timer(inner: &Arc<Self>) {
        let mut timer = inner.timer.lock().unwrap();
        if let Some(previous) = timer.take() {
            previous.abort();
        }
        let handle = tokio::spawn({
            let inner = inner.clone();
            async move {
                tokio::time::sleep(inner.idle_timeout).await;
                inner.expire();
            }
        });
        *timer = Some(handle);
    }

    /// The countdown elapsed with no intervening activity.
    fn expire(&self) {
        {
            let mut machine = self.machine.lock().unwrap();
            if machine.consume(&IdleMachineInput::TimerFired).is_err() {
                // Unmounted between firing and handling
                return;
            }
        }

        info!("Idle timeout reached, terminating session");

        // A concurrent forced logout may already have emptied the store;
        // clear is idempotent so this converges either way.
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear session on idle expiry");
        }
        self.bus.notify(LogoutReason::IdleTimeout);

        if let Some(notice) = self.notice.lock().unwrap().as_ref() {
            notice();
        }

        // Replace history so the user cannot navigate back into the
        // expired session
        self.navigator.replace(&login_url(&self.login_path, None));
    }
}
