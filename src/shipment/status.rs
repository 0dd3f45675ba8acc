// Copyright 2025 Cowboy AI, LLC.

//! Shipment status values and the transition table that moves between them

use crate::errors::ShipmentError;
use crate::state_machine::{State, Transition};
use crate::validation::ValidationErrors;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a shipment is in its approval and delivery workflow.
///
/// Persisted as the exact upper-case literal returned by [`ShipmentStatus::as_str`].
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    /// Being prepared by the service member
    #[default]
    Draft,
    /// Waiting to be awarded to a provider
    Submitted,
    /// Offered to a provider, awaiting their answer
    Awarded,
    /// The provider took the shipment
    Accepted,
    /// Cleared to move
    Approved,
    /// Goods are on the road
    InTransit,
    /// Goods arrived at destination
    Delivered,
    /// Paperwork closed out
    Completed,
}

impl ShipmentStatus {
    /// Every status in workflow order
    pub const ALL: [ShipmentStatus; 8] = [
        ShipmentStatus::Draft,
        ShipmentStatus::Submitted,
        ShipmentStatus::Awarded,
        ShipmentStatus::Accepted,
        ShipmentStatus::Approved,
        ShipmentStatus::InTransit,
        ShipmentStatus::Delivered,
        ShipmentStatus::Completed,
    ];

    /// Persisted literal
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Draft => "DRAFT",
            ShipmentStatus::Submitted => "SUBMITTED",
            ShipmentStatus::Awarded => "AWARDED",
            ShipmentStatus::Accepted => "ACCEPTED",
            ShipmentStatus::Approved => "APPROVED",
            ShipmentStatus::InTransit => "IN_TRANSIT",
            ShipmentStatus::Delivered => "DELIVERED",
            ShipmentStatus::Completed => "COMPLETED",
        }
    }

    /// Whether the shipment has been offered to a provider at some point
    /// and not sent back for re-offer
    pub fn is_offered(&self) -> bool {
        *self >= ShipmentStatus::Awarded
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipmentStatus {
    type Err = ShipmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShipmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                let mut errors = ValidationErrors::new();
                errors.add("status", format!("{s:?} is not a shipment status"));
                ShipmentError::Validation(errors)
            })
    }
}

impl State for ShipmentStatus {
    fn name(&self) -> &'static str {
        self.as_str()
    }

    fn is_terminal(&self) -> bool {
        matches!(self, ShipmentStatus::Completed)
    }
}

/// Caller-driven operations on a shipment's status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShipmentTransition {
    /// Send for award, first time or back for re-offer
    Submit,
    /// Offer to a provider
    Award,
    /// Provider takes the shipment
    Accept,
    /// Office clears the shipment
    Approve,
    /// Goods picked up
    Begin,
    /// Goods dropped off
    Deliver,
    /// Close out
    Complete,
}

impl Transition for ShipmentTransition {
    type State = ShipmentStatus;

    const ALL: &'static [Self] = &[
        ShipmentTransition::Submit,
        ShipmentTransition::Award,
        ShipmentTransition::Accept,
        ShipmentTransition::Approve,
        ShipmentTransition::Begin,
        ShipmentTransition::Deliver,
        ShipmentTransition::Complete,
    ];

    fn name(&self) -> &'static str {
        match self {
            ShipmentTransition::Submit => "submit",
            ShipmentTransition::Award => "award",
            ShipmentTransition::Accept => "accept",
            ShipmentTransition::Approve => "approve",
            ShipmentTransition::Begin => "begin",
            ShipmentTransition::Deliver => "deliver",
            ShipmentTransition::Complete => "complete",
        }
    }

    fn allowed_from(&self) -> &'static [ShipmentStatus] {
        use ShipmentStatus as S;
        match self {
            ShipmentTransition::Submit => &[S::Draft, S::Awarded],
            ShipmentTransition::Award => &[S::Submitted],
            ShipmentTransition::Accept => &[S::Awarded],
            ShipmentTransition::Approve => &[S::Accepted],
            ShipmentTransition::Begin => &[S::Approved],
            ShipmentTransition::Deliver => &[S::InTransit],
            ShipmentTransition::Complete => &[S::Delivered],
        }
    }

    fn target(&self) -> ShipmentStatus {
        use ShipmentStatus as S;
        match self {
            ShipmentTransition::Submit => S::Submitted,
            ShipmentTransition::Award => S::Awarded,
            ShipmentTransition::Accept => S::Accepted,
            ShipmentTransition::Approve => S::Approved,
            ShipmentTransition::Begin => S::InTransit,
            ShipmentTransition::Deliver => S::Delivered,
            ShipmentTransition::Complete => S::Completed,
        }
    }
}
