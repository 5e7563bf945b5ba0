//! Session lifecycle for the Atrium console.
//!
//! This crate ties the session store, the request pipeline, and the
//! logout bus into the client-side lifecycle:
//! - `SessionManager` — login flow and explicit logout
//! - `IdleWatchdog` — inactivity countdown with a sticky expired state
//! - `LoginAttemptLimiter` — client-side lockout after repeated failures
//!
//! Four independent triggers end a session (explicit logout, idle expiry,
//! rejected credentials, lockout never starting one); all of them converge
//! on the store's idempotent clear and one broadcast on the logout bus.

mod config;
mod idle_fsm;
mod limiter;
mod logging;
mod session;
mod watchdog;

pub use config::{
    AuthConfig, DEFAULT_IDLE_TIMEOUT, DEFAULT_LOCKOUT_DURATION, DEFAULT_LOCKOUT_TICK,
    DEFAULT_MAX_LOGIN_ATTEMPTS,
};
pub use idle_fsm::idle_machine;
pub use idle_fsm::{IdleMachine, IdleMachineInput, IdleMachineState, IdleState};
pub use limiter::{LimiterOutcome, LockoutClock, LockoutTick, LoginAttemptLimiter};
pub use logging::init_logging;
pub use session::{AuthStatus, LoginResponse, LoginSubscription, LoginUser, SessionManager};
pub use watchdog::{ActivitySignal, ExpiryNotice, IdleWatchdog};
