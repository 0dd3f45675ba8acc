// Copyright 2025 Cowboy AI, LLC.

//! In-memory gateway with optimistic concurrency
//!
//! Each transaction remembers the version of every record it read. Commit
//! takes the store's write lock, compares those versions with what is stored
//! now, and applies all staged writes only when none of them moved on.

use super::{GatewayTransaction, PersistenceGateway};
use crate::entity::{AggregateRoot, OfferId, ProviderId, ShipmentId};
use crate::errors::{ShipmentError, ShipmentResult};
use crate::offer::ShipmentOffer;
use crate::service_agent::ServiceAgent;
use crate::shipment::Shipment;
use crate::validation::Validate;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct Store {
    shipments: HashMap<ShipmentId, Shipment>,
    offers: IndexMap<OfferId, ShipmentOffer>,
    service_agents: Vec<ServiceAgent>,
    fail_next_commit: Option<String>,
}

/// Gateway backed by process memory, for tests and embedding.
///
/// Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGateway {
    store: Arc<RwLock<Store>>,
}

impl InMemoryGateway {
    /// Create an empty gateway
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a shipment, replacing any stored copy
    pub async fn insert_shipment(&self, shipment: Shipment) {
        self.store
            .write()
            .await
            .shipments
            .insert(shipment.id, shipment);
    }

    /// Seed an offer, replacing any stored copy
    pub async fn insert_offer(&self, offer: ShipmentOffer) {
        self.store.write().await.offers.insert(offer.id, offer);
    }

    /// Committed copy of a shipment
    pub async fn shipment(&self, id: ShipmentId) -> Option<Shipment> {
        self.store.read().await.shipments.get(&id).cloned()
    }

    /// Committed copy of an offer
    pub async fn offer(&self, id: OfferId) -> Option<ShipmentOffer> {
        self.store.read().await.offers.get(&id).cloned()
    }

    /// Committed offers for a shipment, in insertion order
    pub async fn offers_for_shipment(&self, shipment_id: ShipmentId) -> Vec<ShipmentOffer> {
        self.store
            .read()
            .await
            .offers
            .values()
            .filter(|offer| offer.shipment_id == shipment_id)
            .cloned()
            .collect()
    }

    /// Committed service agents for a shipment
    pub async fn service_agents(&self, shipment_id: ShipmentId) -> Vec<ServiceAgent> {
        self.store
            .read()
            .await
            .service_agents
            .iter()
            .filter(|agent| agent.shipment_id == shipment_id)
            .cloned()
            .collect()
    }

    /// Make the next commit fail with a retryable persistence error
    pub async fn fail_next_commit(&self, message: impl Into<String>) {
        self.store.write().await.fail_next_commit = Some(message.into());
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryGateway {
    async fn begin(&self) -> ShipmentResult<Box<dyn GatewayTransaction>> {
        Ok(Box::new(InMemoryTransaction {
            store: Arc::clone(&self.store),
            read_versions: HashMap::new(),
            shipments: IndexMap::new(),
            offers: IndexMap::new(),
            service_agents: Vec::new(),
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RecordKey {
    Shipment(ShipmentId),
    Offer(OfferId),
}

struct InMemoryTransaction {
    store: Arc<RwLock<Store>>,
    read_versions: HashMap<RecordKey, u64>,
    shipments: IndexMap<ShipmentId, Shipment>,
    offers: IndexMap<OfferId, ShipmentOffer>,
    service_agents: Vec<ServiceAgent>,
}

impl InMemoryTransaction {
    fn remember(&mut self, key: RecordKey, version: u64) {
        self.read_versions.entry(key).or_insert(version);
    }

    /// Fails unless every staged record is unchanged since it was read, or
    /// is new and still absent.
    fn check_versions(&self, store: &Store) -> ShipmentResult<()> {
        let shipments = self.shipments.keys().map(|id| {
            (
                RecordKey::Shipment(*id),
                id.to_string(),
                store.shipments.get(id).map(<Shipment as AggregateRoot>::version),
            )
        });
        let offers = self.offers.keys().map(|id| {
            (
                RecordKey::Offer(*id),
                id.to_string(),
                store.offers.get(id).map(<ShipmentOffer as AggregateRoot>::version),
            )
        });

        for (key, id, stored) in shipments.chain(offers) {
            match (self.read_versions.get(&key), stored) {
                (Some(&expected), Some(actual)) if expected != actual => {
                    return Err(ShipmentError::ConcurrencyConflict {
                        id,
                        expected,
                        actual,
                    });
                }
                (Some(_), None) => {
                    return Err(ShipmentError::persistence(
                        format!("record {id} was removed during the transaction"),
                        true,
                    ));
                }
                (None, Some(_)) => {
                    return Err(ShipmentError::persistence(
                        format!("record {id} already exists"),
                        false,
                    ));
                }
                _ => {}
            }
        }

        for agent in &self.service_agents {
            if store.service_agents.iter().any(|a| a.id == agent.id) {
                return Err(ShipmentError::persistence(
                    format!("record {} already exists", agent.id),
                    false,
                ));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl GatewayTransaction for InMemoryTransaction {
    async fn find_shipment(&mut self, id: ShipmentId) -> ShipmentResult<Shipment> {
        if let Some(staged) = self.shipments.get(&id) {
            return Ok(staged.clone());
        }
        let shipment = self
            .store
            .read()
            .await
            .shipments
            .get(&id)
            .cloned()
            .ok_or_else(|| ShipmentError::not_found(Shipment::ENTITY, id))?;
        self.remember(RecordKey::Shipment(id), shipment.version());
        Ok(shipment)
    }

    async fn find_offers_for_provider(
        &mut self,
        provider_id: ProviderId,
        shipment_id: ShipmentId,
    ) -> ShipmentResult<Vec<ShipmentOffer>> {
        let matches = |offer: &ShipmentOffer| {
            offer.provider_id == provider_id && offer.shipment_id == shipment_id
        };

        let mut found: IndexMap<OfferId, ShipmentOffer> = self
            .store
            .read()
            .await
            .offers
            .values()
            .filter(|offer| matches(*offer))
            .map(|offer| (offer.id, offer.clone()))
            .collect();
        for offer in found.values() {
            self.read_versions
                .entry(RecordKey::Offer(offer.id))
                .or_insert(offer.version());
        }
        for staged in self.offers.values().filter(|offer| matches(*offer)) {
            found.insert(staged.id, staged.clone());
        }
        Ok(found.into_values().collect())
    }

    async fn save_shipment(&mut self, shipment: &Shipment) -> ShipmentResult<()> {
        shipment.validate().into_result()?;
        self.shipments.insert(shipment.id, shipment.clone());
        Ok(())
    }

    async fn save_offer(&mut self, offer: &ShipmentOffer) -> ShipmentResult<()> {
        offer.validate().into_result()?;
        self.offers.insert(offer.id, offer.clone());
        Ok(())
    }

    async fn save_service_agent(&mut self, agent: &ServiceAgent) -> ShipmentResult<()> {
        agent.validate().into_result()?;
        self.service_agents.push(agent.clone());
        Ok(())
    }

    async fn service_agents_for_shipment(
        &mut self,
        shipment_id: ShipmentId,
    ) -> ShipmentResult<Vec<ServiceAgent>> {
        let store = self.store.read().await;
        Ok(store
            .service_agents
            .iter()
            .chain(self.service_agents.iter())
            .filter(|agent| agent.shipment_id == shipment_id)
            .cloned()
            .collect())
    }

    async fn commit(self: Box<Self>) -> ShipmentResult<()> {
        let this = *self;
        let handle = Arc::clone(&this.store);
        let mut store = handle.write().await;
        if let Some(message) = store.fail_next_commit.take() {
            return Err(ShipmentError::persistence(message, true));
        }
        this.check_versions(&store)?;

        debug!(
            shipments = this.shipments.len(),
            offers = this.offers.len(),
            service_agents = this.service_agents.len(),
            "committing transaction"
        );
        store.shipments.extend(this.shipments);
        store.offers.extend(this.offers);
        store.service_agents.extend(this.service_agents);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> ShipmentResult<()> {
        debug!(
            staged = self.shipments.len() + self.offers.len() + self.service_agents.len(),
            "rolling back transaction"
        );
        Ok(())
    }
}
