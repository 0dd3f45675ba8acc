// Copyright 2025 Cowboy AI, LLC.

//! Shipment offers: the record of a shipment awarded to one provider
//!
//! An offer is created when a shipment is awarded and is never deleted; it
//! stays behind as the audit trail of the award. Acceptance is stored as a
//! nullable boolean plus a rejection reason, and is only ever changed
//! through [`ShipmentOffer::accept`] and [`ShipmentOffer::reject`].

use crate::entity::{AggregateRoot, OfferId, ProviderId, ShipmentId};
use crate::errors::ShipmentResult;
use crate::state_machine::{apply_transition, State, StateTransition, Transition};
use crate::validation::{Validate, ValidationErrors};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Acceptance state derived from the stored nullable flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferState {
    /// Provider has not answered
    Pending,
    /// Provider took the shipment
    Accepted,
    /// Provider turned the shipment down
    Rejected,
}

impl OfferState {
    fn from_flag(accepted: Option<bool>) -> Self {
        match accepted {
            None => OfferState::Pending,
            Some(true) => OfferState::Accepted,
            Some(false) => OfferState::Rejected,
        }
    }

    fn to_flag(self) -> Option<bool> {
        match self {
            OfferState::Pending => None,
            OfferState::Accepted => Some(true),
            OfferState::Rejected => Some(false),
        }
    }
}

impl State for OfferState {
    fn name(&self) -> &'static str {
        match self {
            OfferState::Pending => "PENDING",
            OfferState::Accepted => "ACCEPTED",
            OfferState::Rejected => "REJECTED",
        }
    }

    fn is_terminal(&self) -> bool {
        !matches!(self, OfferState::Pending)
    }
}

/// Provider answers to an offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OfferTransition {
    /// Take the shipment
    Accept,
    /// Turn the shipment down
    Reject,
}

impl Transition for OfferTransition {
    type State = OfferState;

    const ALL: &'static [Self] = &[OfferTransition::Accept, OfferTransition::Reject];

    fn name(&self) -> &'static str {
        match self {
            OfferTransition::Accept => "accept",
            OfferTransition::Reject => "reject",
        }
    }

    fn allowed_from(&self) -> &'static [OfferState] {
        &[OfferState::Pending]
    }

    fn target(&self) -> OfferState {
        match self {
            OfferTransition::Accept => OfferState::Accepted,
            OfferTransition::Reject => OfferState::Rejected,
        }
    }
}

/// Link between a shipment and the provider it was awarded to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentOffer {
    /// Unique identifier
    pub id: OfferId,
    /// Shipment that was awarded
    pub shipment_id: ShipmentId,
    /// Provider the shipment was awarded to
    pub provider_id: ProviderId,
    accepted: Option<bool>,
    rejection_reason: Option<String>,
    version: u64,
    /// When the offer was made
    pub created_at: DateTime<Utc>,
    /// When the offer last changed
    pub updated_at: DateTime<Utc>,
}

impl ShipmentOffer {
    /// Entity name used in errors and logs
    pub const ENTITY: &'static str = "ShipmentOffer";

    /// Offer a shipment to a provider; the answer starts out unset
    pub fn new(shipment_id: ShipmentId, provider_id: ProviderId) -> Self {
        let now = Utc::now();
        Self {
            id: OfferId::new(),
            shipment_id,
            provider_id,
            accepted: None,
            rejection_reason: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stored acceptance flag: unset, accepted or rejected
    pub fn accepted(&self) -> Option<bool> {
        self.accepted
    }

    /// Reason the provider gave when rejecting
    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    /// Acceptance as a state
    pub fn state(&self) -> OfferState {
        OfferState::from_flag(self.accepted)
    }

    /// Record that the provider took the shipment
    pub fn accept(&mut self) -> ShipmentResult<StateTransition<OfferState>> {
        let transition = self.transition(OfferTransition::Accept)?;
        self.rejection_reason = None;
        Ok(transition)
    }

    /// Record that the provider turned the shipment down and why
    pub fn reject(
        &mut self,
        reason: impl Into<String>,
    ) -> ShipmentResult<StateTransition<OfferState>> {
        let transition = self.transition(OfferTransition::Reject)?;
        self.rejection_reason = Some(reason.into());
        Ok(transition)
    }

    fn transition(&mut self, op: OfferTransition) -> ShipmentResult<StateTransition<OfferState>> {
        let mut state = self.state();
        let transition = apply_transition(Self::ENTITY, self.id, &mut state, op)?;
        self.accepted = state.to_flag();
        self.updated_at = transition.timestamp;
        self.increment_version();
        Ok(transition)
    }
}

impl AggregateRoot for ShipmentOffer {
    type Id = OfferId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn increment_version(&mut self) {
        self.version += 1;
    }
}

impl Validate for ShipmentOffer {
    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        match (self.accepted, self.rejection_reason.as_deref()) {
            (Some(false), None) => errors.add("rejection_reason", "can not be blank"),
            (Some(false), Some(reason)) => errors.require_present("rejection_reason", reason),
            (_, Some(_)) => errors.add("rejection_reason", "is only allowed on a rejected offer"),
            _ => {}
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer() -> ShipmentOffer {
        ShipmentOffer::new(ShipmentId::new(), ProviderId::new())
    }

    #[test]
    fn test_new_offer_is_pending() {
        let offer = offer();
        assert_eq!(offer.accepted(), None);
        assert_eq!(offer.state(), OfferState::Pending);
        assert!(offer.rejection_reason().is_none());
        assert!(!offer.validate().has_any());
    }

    #[test]
    fn test_accept_sets_flag() {
        let mut offer = offer();
        let transition = offer.accept().unwrap();
        assert_eq!(transition.from, OfferState::Pending);
        assert_eq!(transition.to, OfferState::Accepted);
        assert_eq!(offer.accepted(), Some(true));
        assert_eq!(offer.version(), 1);
    }

    #[test]
    fn test_reject_stores_reason() {
        let mut offer = offer();
        offer.reject("Not enough trucks").unwrap();
        assert_eq!(offer.accepted(), Some(false));
        assert_eq!(offer.rejection_reason(), Some("Not enough trucks"));
        assert!(!offer.validate().has_any());
    }

    /// A provider answers an offer once
    #[test]
    fn test_answered_offer_refuses_second_answer() {
        let mut offer = offer();
        offer.accept().unwrap();
        let before = offer.clone();

        let err = offer.reject("changed my mind").unwrap_err();
        assert!(err.is_invalid_transition());
        assert!(offer.accept().is_err());
        assert_eq!(offer, before);
    }

    #[test]
    fn test_blank_rejection_reason_is_invalid() {
        let mut offer = offer();
        offer.reject("  ").unwrap();
        assert!(offer.validate().get("rejection_reason").is_some());
    }

    #[test]
    fn test_serialized_shape_keeps_nullable_flag() {
        let offer = offer();
        let value = serde_json::to_value(&offer).unwrap();
        assert!(value["accepted"].is_null());
        assert!(value["rejection_reason"].is_null());
    }
}
