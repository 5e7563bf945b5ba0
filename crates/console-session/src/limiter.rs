//! Client-side login attempt limiting.
//!
//! Held by the login view, never persisted, never on the network path:
//! the limiter only counts credential rejections and refuses submission
//! during the cooldown that follows too many of them.

use crate::config::AuthConfig;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use console_api::ApiError;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Outcome of recording a failed login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimiterOutcome {
    /// The failure was not a credential rejection; nothing was counted.
    NotCounted,
    /// Counted; this many attempts remain before lockout.
    RemainingAttempts(u32),
    /// The threshold was reached; submission is locked until the instant.
    LockedOut { until: DateTime<Utc> },
}

/// Tracks consecutive credential failures for one login form.
pub struct LoginAttemptLimiter {
    failure_count: u32,
    lock_until: Option<DateTime<Utc>>,
    max_attempts: u32,
    lockout: ChronoDuration,
}

impl LoginAttemptLimiter {
    /// Create a limiter with the configured threshold and cooldown.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            failure_count: 0,
            lock_until: None,
            max_attempts: config.max_login_attempts,
            lockout: ChronoDuration::from_std(config.lockout_duration)
                .unwrap_or_else(|_| ChronoDuration::seconds(30)),
        }
    }

    /// Consecutive credential failures so far.
    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    /// When the active lock ends, if one is active.
    pub fn lock_until(&self) -> Option<DateTime<Utc>> {
        self.lock_until
    }

    /// Whether submission may proceed right now.
    ///
    /// The login form checks this before constructing any request; while
    /// locked, no call reaches the server.
    pub fn submit_allowed(&self) -> bool {
        match self.lock_until {
            Some(until) => Utc::now() >= until,
            None => true,
        }
    }

    /// Seconds left on the lock, if one is active.
    pub fn remaining_lock_seconds(&self) -> Option<i64> {
        self.lock_until.and_then(|until| {
            let remaining = (until - Utc::now()).num_seconds();
            (remaining > 0).then_some(remaining)
        })
    }

    /// Record a login failure.
    ///
    /// Only credential rejections count toward the lockout; suspended
    /// tenants, missing permissions, and transport failures are reported
    /// to the user without touching the counter.
    pub fn record_failure(&mut self, error: &ApiError) -> LimiterOutcome {
        if !matches!(error, ApiError::InvalidCredentials(_)) {
            return LimiterOutcome::NotCounted;
        }

        self.failure_count += 1;
        if self.failure_count >= self.max_attempts {
            let until = Utc::now() + self.lockout;
            self.failure_count = 0;
            self.lock_until = Some(until);
            debug!(until = %until, "Login attempts locked out");
            LimiterOutcome::LockedOut { until }
        } else {
            LimiterOutcome::RemainingAttempts(self.max_attempts - self.failure_count)
        }
    }

    /// Record a successful login, resetting the counter and any lock.
    pub fn record_success(&mut self) {
        self.failure_count = 0;
        self.lock_until = None;
    }

    /// Recompute the lock for display, clearing it once elapsed.
    ///
    /// Returns the remaining seconds while locked, `None` otherwise.
    pub fn tick(&mut self) -> Option<i64> {
        match self.remaining_lock_seconds() {
            Some(remaining) => Some(remaining),
            None => {
                if self.lock_until.take().is_some() {
                    debug!("Login lockout elapsed, submission re-enabled");
                }
                None
            }
        }
    }
}

/// Display callback fed by the lockout clock.
pub type LockoutTick = Box<dyn Fn(Option<i64>) + Send + Sync>;

/// Drives `tick` on an interval for the countdown display.
///
/// Cancelled on drop, exactly like the watchdog timer, so a torn-down
/// login view leaves no clock behind.
pub struct LockoutClock {
    handle: JoinHandle<()>,
}

impl LockoutClock {
    /// Start ticking the limiter every `interval`.
    pub fn start(
        limiter: Arc<Mutex<LoginAttemptLimiter>>,
        interval: Duration,
        on_tick: LockoutTick,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(interval);
            loop {
                interval.tick().await;
                let remaining = limiter.lock().unwrap().tick();
                on_tick(remaining);
            }
        });
        Self { handle }
    }
}

impl Drop for LockoutClock {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
