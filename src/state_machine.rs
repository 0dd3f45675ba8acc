// Copyright 2025 Cowboy AI, LLC.

//! Guarded state machines for shipment records
//!
//! A record's status is an enum implementing [`State`]. Each caller-visible
//! operation is a value of an enum implementing [`Transition`]: it names the
//! statuses it may start from and the single status it produces. The input
//! (the operation) together with the current state decides the outcome, so
//! these are Mealy machines with a table of guarded edges.
//!
//! [`apply_transition`] is the only place a status changes. It checks the
//! guard, swaps the status in place and hands back a [`StateTransition`]
//! audit record. On rejection the status is untouched.

use crate::errors::{ShipmentError, ShipmentResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::{Debug, Display};
use tracing::debug;
use uuid::Uuid;

/// Trait for types that can be used as states in a state machine
pub trait State: Debug + Copy + PartialEq + Eq + Send + Sync + 'static {
    /// Get the name of this state for logging and persistence
    fn name(&self) -> &'static str;

    /// Check if this is a terminal state
    fn is_terminal(&self) -> bool {
        false
    }
}

/// A caller-driven operation with a fixed guard and a fixed outcome
///
/// # Examples
///
/// ```rust
/// use shipment_lifecycle::state_machine::{State, Transition};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &'static str {
///         match self {
///             Door::Open => "OPEN",
///             Door::Closed => "CLOSED",
///         }
///     }
/// }
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum DoorOp {
///     Close,
/// }
///
/// impl Transition for DoorOp {
///     type State = Door;
///     const ALL: &'static [Self] = &[DoorOp::Close];
///
///     fn name(&self) -> &'static str {
///         "close"
///     }
///     fn allowed_from(&self) -> &'static [Door] {
///         &[Door::Open]
///     }
///     fn target(&self) -> Door {
///         Door::Closed
///     }
/// }
///
/// assert!(DoorOp::Close.permits(&Door::Open));
/// assert!(!DoorOp::Close.permits(&Door::Closed));
/// ```
pub trait Transition: Debug + Copy + Send + Sync + 'static {
    /// The state type this operation moves between
    type State: State;

    /// Every operation of this machine
    const ALL: &'static [Self];

    /// Operation name used in errors and logs
    fn name(&self) -> &'static str;

    /// States from which the operation is permitted
    fn allowed_from(&self) -> &'static [Self::State];

    /// State produced by the operation
    fn target(&self) -> Self::State;

    /// Whether the operation may run from `current`
    fn permits(&self, current: &Self::State) -> bool {
        !current.is_terminal() && self.allowed_from().contains(current)
    }

    /// Operations that may run from `current`
    fn available_from(current: &Self::State) -> Vec<Self> {
        Self::ALL
            .iter()
            .copied()
            .filter(|op| op.permits(current))
            .collect()
    }
}

/// Audit record of an accepted state change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateTransition<S> {
    /// The state before the transition
    pub from: S,
    /// The state after the transition
    pub to: S,
    /// The operation that caused the transition
    pub operation: &'static str,
    /// Unique identifier for this transition instance
    pub transition_id: Uuid,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Check `op`'s guard against `current` and, when it holds, move `current`
/// to the operation's target.
///
/// `entity` and `id` only label the error and log output.
pub fn apply_transition<T: Transition>(
    entity: &'static str,
    id: impl Display,
    current: &mut T::State,
    op: T,
) -> ShipmentResult<StateTransition<T::State>> {
    if !op.permits(current) {
        return Err(ShipmentError::InvalidTransition {
            entity,
            id: id.to_string(),
            operation: op.name(),
            from: current.name(),
        });
    }

    let transition = StateTransition {
        from: *current,
        to: op.target(),
        operation: op.name(),
        transition_id: Uuid::new_v4(),
        timestamp: Utc::now(),
    };
    *current = transition.to;

    debug!(
        entity,
        id = %id,
        operation = transition.operation,
        from = transition.from.name(),
        to = transition.to.name(),
        "state transition applied"
    );

    Ok(transition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Red,
        Green,
        Off,
    }

    impl State for Light {
        fn name(&self) -> &'static str {
            match self {
                Light::Red => "RED",
                Light::Green => "GREEN",
                Light::Off => "OFF",
            }
        }

        fn is_terminal(&self) -> bool {
            matches!(self, Light::Off)
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum LightOp {
        Go,
        Stop,
        PowerDown,
    }

    impl Transition for LightOp {
        type State = Light;
        const ALL: &'static [Self] = &[LightOp::Go, LightOp::Stop, LightOp::PowerDown];

        fn name(&self) -> &'static str {
            match self {
                LightOp::Go => "go",
                LightOp::Stop => "stop",
                LightOp::PowerDown => "power_down",
            }
        }

        fn allowed_from(&self) -> &'static [Light] {
            match self {
                LightOp::Go => &[Light::Red],
                LightOp::Stop => &[Light::Green],
                LightOp::PowerDown => &[Light::Red, Light::Green, Light::Off],
            }
        }

        fn target(&self) -> Light {
            match self {
                LightOp::Go => Light::Green,
                LightOp::Stop => Light::Red,
                LightOp::PowerDown => Light::Off,
            }
        }
    }

    #[test]
    fn test_apply_transition_moves_state() {
        let mut light = Light::Red;
        let record = apply_transition("Light", 1, &mut light, LightOp::Go).unwrap();

        assert_eq!(light, Light::Green);
        assert_eq!(record.from, Light::Red);
        assert_eq!(record.to, Light::Green);
        assert_eq!(record.operation, "go");
    }

    #[test]
    fn test_rejected_transition_leaves_state() {
        let mut light = Light::Red;
        let err = apply_transition("Light", 7, &mut light, LightOp::Stop).unwrap_err();

        assert_eq!(light, Light::Red);
        match err {
            ShipmentError::InvalidTransition {
                entity,
                id,
                operation,
                from,
            } => {
                assert_eq!(entity, "Light");
                assert_eq!(id, "7");
                assert_eq!(operation, "stop");
                assert_eq!(from, "RED");
            }
            other => panic!("expected InvalidTransition, got {other:?}"),
        }
    }

    /// Terminal states refuse every operation, even ones listing them
    #[test]
    fn test_terminal_state_blocks_all_operations() {
        let mut light = Light::Off;
        assert!(apply_transition("Light", 1, &mut light, LightOp::PowerDown).is_err());
        assert!(LightOp::available_from(&Light::Off).is_empty());
    }

    #[test]
    fn test_available_from() {
        assert_eq!(
            LightOp::available_from(&Light::Red),
            vec![LightOp::Go, LightOp::PowerDown]
        );
    }
}
