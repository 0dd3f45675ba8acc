// Copyright 2025 Cowboy AI, LLC.

//! # Shipment Lifecycle
//!
//! Core lifecycle and scheduling engine for relocation shipments.
//!
//! The crate provides three tightly coupled pieces:
//! - **Shipment State Machine**: the status of a [`Shipment`] only changes
//!   through guarded transitions; illegal transitions are rejected and leave
//!   the record untouched
//! - **Offer Coordination**: a provider's accept or reject changes the
//!   shipment and its [`ShipmentOffer`] in one transaction through a
//!   [`PersistenceGateway`]
//! - **Move Date Scheduling**: pack, pickup, transit and delivery windows
//!   derived from entitlement weight, distance and a business calendar
//!
//! ## Design Principles
//!
//! 1. **Type Safety**: phantom-typed identifiers keep shipment, offer and
//!    provider ids apart
//! 2. **Controlled State**: status fields are private and move only through
//!    transition operations
//! 3. **Atomicity**: paired record changes commit together or not at all
//! 4. **Purity**: date computation has no side effects and needs no locking

#![warn(missing_docs)]

mod entity;
mod errors;
mod validation;

pub mod config;
pub mod coordinator;
pub mod domain;
pub mod offer;
pub mod persistence;
pub mod scheduling;
pub mod service_agent;
pub mod shipment;
pub mod state_machine;

/// Marker types parameterizing [`EntityId`]
pub mod markers {
    pub use crate::entity::{
        MoveMarker, OfferMarker, ProviderMarker, ServiceAgentMarker, ShipmentMarker,
        TrafficDistributionListMarker,
    };
}

// Re-export core types
pub use config::EngineConfig;
pub use coordinator::{CoordinatorConfig, ShipmentCoordinator};
pub use domain::{Address, Miles, Pound};
pub use entity::{
    AggregateRoot, EntityId, MoveId, OfferId, ProviderId, ServiceAgentId, ShipmentId,
    TrafficDistributionListId,
};
pub use errors::{ShipmentError, ShipmentResult};
pub use offer::{OfferState, OfferTransition, ShipmentOffer};
pub use persistence::{GatewayTransaction, InMemoryGateway, PersistenceGateway};
pub use scheduling::{
    BusinessCalendar, CalendarConfig, EntitlementCalculator, MoveDateScheduler, MoveDatesSummary,
    MoveOrders, Rank, SchedulerConfig, StandardEntitlements, UsFederalCalendar,
};
pub use service_agent::{NewServiceAgent, ServiceAgent, ServiceAgentRole};
pub use shipment::{PmSurvey, Shipment, ShipmentStatus, ShipmentTransition, SurveyMethod};
pub use state_machine::{State, StateTransition, Transition};
pub use validation::{Validate, ValidationErrors};
