// Copyright 2025 Cowboy AI, LLC.

//! Typed identities for shipment records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// A typed entity ID using phantom types for type safety
///
/// The phantom type parameter keeps a shipment id from being passed where a
/// provider id is expected.
///
/// # Examples
///
/// ```rust
/// use shipment_lifecycle::{EntityId, ProviderId, ShipmentId};
/// use shipment_lifecycle::markers::ShipmentMarker;
///
/// let shipment_id: ShipmentId = EntityId::new();
/// let provider_id = ProviderId::new();
/// assert_ne!(shipment_id.as_uuid(), provider_id.as_uuid());
///
/// // Explicit casts are possible but must be spelled out:
/// let _: EntityId<ShipmentMarker> = provider_id.cast();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId<T> {
    id: Uuid,
    #[serde(skip)]
    _phantom: PhantomData<T>,
}

impl<T> EntityId<T> {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            _phantom: PhantomData,
        }
    }

    /// Create an entity ID from a UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.id
    }

    /// Convert to a different entity ID type (use with caution)
    pub fn cast<U>(self) -> EntityId<U> {
        EntityId {
            id: self.id,
            _phantom: PhantomData,
        }
    }
}

impl<T> fmt::Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> Default for EntityId<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<EntityId<T>> for Uuid {
    fn from(id: EntityId<T>) -> Self {
        id.id
    }
}

/// Records that are loaded, changed and saved as a unit
///
/// The version supports optimistic concurrency: every accepted change
/// increments it and the gateway refuses to commit over a newer version.
pub trait AggregateRoot: Sized {
    /// The type of ID for this aggregate
    type Id: Copy + Eq + Send + Sync;

    /// Get the aggregate's ID
    fn id(&self) -> Self::Id;

    /// Get the aggregate's version for optimistic concurrency
    fn version(&self) -> u64;

    /// Increment the version
    fn increment_version(&mut self);
}

/// Marker for shipment records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShipmentMarker;

/// Marker for shipment offer records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OfferMarker;

/// Marker for transportation service providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProviderMarker;

/// Marker for service agent records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceAgentMarker;

/// Marker for moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MoveMarker;

/// Marker for traffic distribution lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrafficDistributionListMarker;

/// Shipment identifier
pub type ShipmentId = EntityId<ShipmentMarker>;
/// Shipment offer identifier
pub type OfferId = EntityId<OfferMarker>;
/// Transportation service provider identifier
pub type ProviderId = EntityId<ProviderMarker>;
/// Service agent identifier
pub type ServiceAgentId = EntityId<ServiceAgentMarker>;
/// Move identifier
pub type MoveId = EntityId<MoveMarker>;
/// Traffic distribution list identifier
pub type TrafficDistributionListId = EntityId<TrafficDistributionListMarker>;
