//! Session lifecycle configuration.

use std::time::Duration;
use tracing::warn;

/// Inactivity window before the watchdog terminates the session.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(5 * 60);
/// Consecutive credential failures before lockout.
pub const DEFAULT_MAX_LOGIN_ATTEMPTS: u32 = 5;
/// How long a lockout lasts.
pub const DEFAULT_LOCKOUT_DURATION: Duration = Duration::from_secs(30);
/// Display refresh interval for the lockout countdown.
pub const DEFAULT_LOCKOUT_TICK: Duration = Duration::from_secs(1);

/// Configuration for the session lifecycle components.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Inactivity window before forced termination.
    pub idle_timeout: Duration,
    /// Credential failures tolerated before lockout.
    pub max_login_attempts: u32,
    /// Lockout duration once the threshold is reached.
    pub lockout_duration: Duration,
    /// Lockout countdown refresh interval.
    pub lockout_tick: Duration,
    /// Login entry point path for termination redirects.
    pub login_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            max_login_attempts: DEFAULT_MAX_LOGIN_ATTEMPTS,
            lockout_duration: DEFAULT_LOCKOUT_DURATION,
            lockout_tick: DEFAULT_LOCKOUT_TICK,
            login_path: console_api::DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

impl AuthConfig {
    /// Build a config from the environment, falling back to the defaults.
    ///
    /// Recognized variables: `ATRIUM_IDLE_TIMEOUT_SECS`,
    /// `ATRIUM_MAX_LOGIN_ATTEMPTS`, `ATRIUM_LOCKOUT_SECS`,
    /// `ATRIUM_LOGIN_PATH`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(secs) = env_u64("ATRIUM_IDLE_TIMEOUT_SECS") {
            config.idle_timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = env_u64("ATRIUM_MAX_LOGIN_ATTEMPTS") {
            config.max_login_attempts = attempts as u32;
        }
        if let Some(secs) = env_u64("ATRIUM_LOCKOUT_SECS") {
            config.lockout_duration = Duration::from_secs(secs);
        }
        if let Ok(path) = std::env::var("ATRIUM_LOGIN_PATH") {
            if !path.trim().is_empty() {
                config.login_path = path;
            }
        }
        config
    }
}

fn env_u64(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = name, value = %raw, "Ignoring unparseable configuration value");
            None
        }
    }
}
