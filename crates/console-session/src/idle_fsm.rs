//! Idle watchdog state machine using rust-fsm.
//!
//! ## State Diagram
//!
//! ```text
//! ┌─────────────────┐
//! │    Inactive     │ (initial; no session to protect)
//! └────────┬────────┘
//!          │ Arm
//!          ▼
//! ┌─────────────────┐  Activity (restarts countdown)
//! │     Armed       │ ─────┐
//! └────────┬────────┘ ◄────┘
//!          │
//!          │ TimerFired            Disarm
//!          ▼                  (Armed → Inactive)
//! ┌─────────────────┐
//! │     Expired     │ (terminal per mount; activity is rejected)
//! └─────────────────┘
//! ```

use rust_fsm::*;
use serde::{Deserialize, Serialize};

// Define the FSM using rust-fsm's declarative macro.
// `Expired` has no outgoing transitions: once a mount expires, every
// further input is rejected, which is what makes expiry sticky.
state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub idle_machine(Inactive)

    Inactive => {
        Arm => Armed
    },
    Armed => {
        Activity => Armed,
        TimerFired => Expired,
        Disarm => Inactive
    }
}

// Re-export the generated types with clearer names
pub use idle_machine::Input as IdleMachineInput;
pub use idle_machine::State as IdleMachineState;
pub use idle_machine::StateMachine as IdleMachine;

/// Watchdog lifecycle state for external consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdleState {
    /// No protected view mounted, or no session to protect.
    Inactive,
    /// Countdown running.
    Armed,
    /// The countdown elapsed; terminal for this mount.
    Expired,
}

impl IdleState {
    /// Returns true once the watchdog has terminated the session.
    pub fn is_expired(&self) -> bool {
        matches!(self, IdleState::Expired)
    }
}

impl From<&IdleMachineState> for IdleState {
    fn from(state: &IdleMachineState) -> Self {
        match state {
            IdleMachineState::Inactive => IdleState::Inactive,
            IdleMachineState::Armed => IdleState::Armed,
            IdleMachineState::Expired => IdleState::Expired,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_inactive() {
        let machine = IdleMachine::new();
        assert_eq!(*machine.state(), IdleMachineState::Inactive);
    }

    #[test]
    fn test_arm_and_expire() {
        let mut machine = IdleMachine::new();

        machine.consume(&IdleMachineInput::Arm).unwrap();
        assert_eq!(*machine.state(), IdleMachineState::Armed);

        machine.consume(&IdleMachineInput::TimerFired).unwrap();
        assert_eq!(*machine.state(), IdleMachineState::Expired);
    }

    #[test]
    fn test_activity_keeps_armed() {
        let mut machine = IdleMachine::new();
        machine.consume(&IdleMachineInput::Arm).unwrap();

        machine.consume(&IdleMachineInput::Activity).unwrap();
        machine.consume(&IdleMachineInput::Activity).unwrap();
        assert_eq!(*machine.state(), IdleMachineState::Armed);
    }

    #[test]
    fn test_disarm_returns_to_inactive() {
        let mut machine = IdleMachine::new();
        machine.consume(&IdleMachineInput::Arm).unwrap();

        machine.consume(&IdleMachineInput::Disarm).unwrap();
        assert_eq!(*machine.state(), IdleMachineState::Inactive);
    }

    #[test]
    fn test_expired_rejects_every_input() {
        let mut machine = IdleMachine::new();
        machine.consume(&IdleMachineInput::Arm).unwrap();
        machine.consume(&IdleMachineInput::TimerFired).unwrap();

        assert!(machine.consume(&IdleMachineInput::Activity).is_err());
        assert!(machine.consume(&IdleMachineInput::Arm).is_err());
        assert!(machine.consume(&IdleMachineInput::Disarm).is_err());
        assert_eq!(*machine.state(), IdleMachineState::Expired);
    }

    #[test]
    fn test_activity_while_inactive_is_rejected() {
        let mut machine = IdleMachine::new();
        assert!(machine.consume(&IdleMachineInput::Activity).is_err());
        assert_eq!(*machine.state(), IdleMachineState::Inactive);
    }

    #[test]
    fn test_idle_state_conversion() {
        assert_eq!(
            IdleState::from(&IdleMachineState::Inactive),
            IdleState::Inactive
        );
        assert_eq!(IdleState::from(&IdleMachineState::Armed), IdleState::Armed);
        assert_eq!(
            IdleState::from(&IdleMachineState::Expired),
            IdleState::Expired
        );
        assert!(IdleState::Expired.is_expired());
        assert!(!IdleState::Armed.is_expired());
    }
}
