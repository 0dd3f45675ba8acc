// Copyright 2025 Cowboy AI, LLC.

//! Persistence boundary for shipments, offers and service agents
//!
//! Storage is reached only through an explicit unit of work: a caller opens a
//! [`GatewayTransaction`] with [`PersistenceGateway::begin`], reads and stages
//! writes through it, and then commits or rolls back. Nothing staged is
//! visible to other transactions before commit, and a transaction dropped
//! without commit discards its writes.

mod in_memory;

pub use in_memory::InMemoryGateway;

use crate::entity::{ProviderId, ShipmentId};
use crate::errors::ShipmentResult;
use crate::offer::ShipmentOffer;
use crate::service_agent::ServiceAgent;
use crate::shipment::Shipment;
use async_trait::async_trait;

/// Source of transactions over durable storage
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Open a new unit of work
    async fn begin(&self) -> ShipmentResult<Box<dyn GatewayTransaction>>;
}

/// One unit of work against storage.
///
/// Reads see the transaction's own staged writes. Implementations translate
/// "no row" into [`ShipmentError::NotFound`](crate::ShipmentError::NotFound)
/// and refuse to stage a record that fails validation.
#[async_trait]
pub trait GatewayTransaction: Send {
    /// Load a shipment by id
    async fn find_shipment(&mut self, id: ShipmentId) -> ShipmentResult<Shipment>;

    /// Every offer linking `shipment_id` to `provider_id`
    async fn find_offers_for_provider(
        &mut self,
        provider_id: ProviderId,
        shipment_id: ShipmentId,
    ) -> ShipmentResult<Vec<ShipmentOffer>>;

    /// Validate and stage a shipment write
    async fn save_shipment(&mut self, shipment: &Shipment) -> ShipmentResult<()>;

    /// Validate and stage an offer write
    async fn save_offer(&mut self, offer: &ShipmentOffer) -> ShipmentResult<()>;

    /// Validate and stage a new service agent
    async fn save_service_agent(&mut self, agent: &ServiceAgent) -> ShipmentResult<()>;

    /// Service agents recorded for a shipment, oldest first
    async fn service_agents_for_shipment(
        &mut self,
        shipment_id: ShipmentId,
    ) -> ShipmentResult<Vec<ServiceAgent>>;

    /// Make every staged write visible at once, or none of them
    async fn commit(self: Box<Self>) -> ShipmentResult<()>;

    /// Discard every staged write
    async fn rollback(self: Box<Self>) -> ShipmentResult<()>;
}
