// Copyright 2025 Cowboy AI, LLC.

//! Offer-coupled shipment transitions
//!
//! A provider's answer changes two records: the shipment's status and the
//! offer's acceptance flag. [`ShipmentCoordinator`] applies both inside one
//! gateway transaction so no reader ever sees one without the other. Every
//! unit of work is bounded by [`CoordinatorConfig::transaction_timeout_ms`];
//! on any failure, including the timeout, nothing is committed.

use crate::entity::{ProviderId, ShipmentId};
use crate::errors::{ShipmentError, ShipmentResult};
use crate::offer::ShipmentOffer;
use crate::persistence::{GatewayTransaction, PersistenceGateway};
use crate::service_agent::{NewServiceAgent, ServiceAgent};
use crate::shipment::{PmSurvey, Shipment, ShipmentStatus};
use crate::state_machine::State;
use crate::validation::{Validate, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Default bound on one unit of work
pub const DEFAULT_TRANSACTION_TIMEOUT_MS: u64 = 5000;

/// Coordinator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Upper bound on a unit of work, from begin to commit
    pub transaction_timeout_ms: u64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            transaction_timeout_ms: DEFAULT_TRANSACTION_TIMEOUT_MS,
        }
    }
}

impl CoordinatorConfig {
    /// The timeout as a duration
    pub fn transaction_timeout(&self) -> Duration {
        Duration::from_millis(self.transaction_timeout_ms)
    }
}

/// Applies shipment transitions, with their paired offer changes, atomically
#[derive(Debug, Clone)]
pub struct ShipmentCoordinator<G> {
    gateway: G,
    config: CoordinatorConfig,
}

impl<G: PersistenceGateway> ShipmentCoordinator<G> {
    /// Coordinator with default settings
    pub fn new(gateway: G) -> Self {
        Self::with_config(gateway, CoordinatorConfig::default())
    }

    /// Coordinator with explicit settings
    pub fn with_config(gateway: G, config: CoordinatorConfig) -> Self {
        Self { gateway, config }
    }

    /// Gateway the coordinator writes through
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Active settings
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// The shipment, provided exactly one offer links it to `provider_id`
    pub async fn fetch_for_provider(
        &self,
        provider_id: ProviderId,
        shipment_id: ShipmentId,
    ) -> ShipmentResult<Shipment> {
        self.run("fetch_for_provider", async {
            let mut tx = self.gateway.begin().await?;
            let outcome = load_pair(tx.as_mut(), provider_id, shipment_id)
                .await
                .map(|(shipment, _)| shipment);
            finish(tx, "fetch_for_provider", outcome).await
        })
        .await
    }

    /// Provider takes the shipment: AWARDED becomes ACCEPTED and the offer is
    /// marked accepted
    pub async fn accept_for_provider(
        &self,
        provider_id: ProviderId,
        shipment_id: ShipmentId,
    ) -> ShipmentResult<(Shipment, ShipmentOffer)> {
        self.run("accept_for_provider", async {
            let mut tx = self.gateway.begin().await?;
            let outcome = accept_pair(tx.as_mut(), provider_id, shipment_id).await;
            finish(tx, "accept_for_provider", outcome).await
        })
        .await
    }

    /// Provider turns the shipment down: AWARDED goes back to SUBMITTED for
    /// re-offer and the offer is marked rejected with `reason`
    pub async fn reject_for_provider(
        &self,
        provider_id: ProviderId,
        shipment_id: ShipmentId,
        reason: impl Into<String>,
    ) -> ShipmentResult<(Shipment, ShipmentOffer)> {
        let reason = reason.into();
        self.run("reject_for_provider", async {
            let mut tx = self.gateway.begin().await?;
            let outcome = reject_pair(tx.as_mut(), provider_id, shipment_id, reason).await;
            finish(tx, "reject_for_provider", outcome).await
        })
        .await
    }

    /// SUBMITTED becomes AWARDED
    pub async fn award_shipment(&self, shipment_id: ShipmentId) -> ShipmentResult<Shipment> {
        self.transition_shipment("award_shipment", shipment_id, Shipment::award)
            .await
    }

    /// SUBMITTED becomes AWARDED and an offer to `provider_id` is created in
    /// the same transaction
    pub async fn award_to_provider(
        &self,
        shipment_id: ShipmentId,
        provider_id: ProviderId,
    ) -> ShipmentResult<(Shipment, ShipmentOffer)> {
        self.run("award_to_provider", async {
            let mut tx = self.gateway.begin().await?;
            let outcome = award_pair(tx.as_mut(), shipment_id, provider_id).await;
            finish(tx, "award_to_provider", outcome).await
        })
        .await
    }

    /// DRAFT (or AWARDED) becomes SUBMITTED
    pub async fn submit_shipment(&self, shipment_id: ShipmentId) -> ShipmentResult<Shipment> {
        self.transition_shipment("submit_shipment", shipment_id, Shipment::submit)
            .await
    }

    /// Record the provider's pre-move survey on a shipment offered to them
    pub async fn update_survey_for_provider(
        &self,
        provider_id: ProviderId,
        shipment_id: ShipmentId,
        survey: PmSurvey,
    ) -> ShipmentResult<Shipment> {
        self.run("update_survey_for_provider", async {
            let mut tx = self.gateway.begin().await?;
            let outcome = async {
                let (mut shipment, _) = load_pair(tx.as_mut(), provider_id, shipment_id).await?;
                shipment.apply_pm_survey(survey);
                save_validated(tx.as_mut(), &shipment, None).await?;
                Ok(shipment)
            }
            .await;
            finish(tx, "update_survey_for_provider", outcome).await
        })
        .await
    }

    /// Add a point of contact to an existing shipment
    pub async fn create_service_agent(
        &self,
        shipment_id: ShipmentId,
        input: NewServiceAgent,
    ) -> ShipmentResult<ServiceAgent> {
        self.run("create_service_agent", async {
            let mut tx = self.gateway.begin().await?;
            let outcome = async {
                let shipment = tx.find_shipment(shipment_id).await?;
                let agent = ServiceAgent::create(shipment.id, input)?;
                tx.save_service_agent(&agent).await?;
                Ok(agent)
            }
            .await;
            finish(tx, "create_service_agent", outcome).await
        })
        .await
    }

    /// Points of contact of an existing shipment, oldest first
    pub async fn service_agents_for_shipment(
        &self,
        shipment_id: ShipmentId,
    ) -> ShipmentResult<Vec<ServiceAgent>> {
        self.run("service_agents_for_shipment", async {
            let mut tx = self.gateway.begin().await?;
            let outcome = async {
                tx.find_shipment(shipment_id).await?;
                tx.service_agents_for_shipment(shipment_id).await
            }
            .await;
            finish(tx, "service_agents_for_shipment", outcome).await
        })
        .await
    }

    async fn transition_shipment<F, S>(
        &self,
        operation: &'static str,
        shipment_id: ShipmentId,
        transition: F,
    ) -> ShipmentResult<Shipment>
    where
        F: FnOnce(&mut Shipment) -> ShipmentResult<S> + Send,
    {
        self.run(operation, async {
            let mut tx = self.gateway.begin().await?;
            let outcome = async {
                let mut shipment = tx.find_shipment(shipment_id).await?;
                transition(&mut shipment)?;
                save_validated(tx.as_mut(), &shipment, None).await?;
                Ok(shipment)
            }
            .await;
            finish(tx, operation, outcome).await
        })
        .await
    }

    async fn run<T>(
        &self,
        operation: &'static str,
        work: impl Future<Output = ShipmentResult<T>>,
    ) -> ShipmentResult<T> {
        match tokio::time::timeout(self.config.transaction_timeout(), work).await {
            Ok(Ok(value)) => {
                info!(operation, "unit of work committed");
                Ok(value)
            }
            Ok(Err(error)) => {
                warn!(operation, %error, "unit of work aborted");
                Err(error)
            }
            Err(_) => {
                let timeout_ms = self.config.transaction_timeout_ms;
                warn!(operation, timeout_ms, "unit of work timed out");
                Err(ShipmentError::TransactionTimeout {
                    operation,
                    timeout_ms,
                })
            }
        }
    }
}

/// Commit on success, roll back on failure
async fn finish<T>(
    tx: Box<dyn GatewayTransaction>,
    operation: &'static str,
    outcome: ShipmentResult<T>,
) -> ShipmentResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback_error) = tx.rollback().await {
                warn!(operation, %rollback_error, "rollback failed");
            }
            Err(error)
        }
    }
}

async fn load_pair(
    tx: &mut dyn GatewayTransaction,
    provider_id: ProviderId,
    shipment_id: ShipmentId,
) -> ShipmentResult<(Shipment, ShipmentOffer)> {
    let mut offers = tx.find_offers_for_provider(provider_id, shipment_id).await?;
    if offers.len() > 1 {
        warn!(
            %provider_id,
            %shipment_id,
            offers = offers.len(),
            "ambiguous offers for provider"
        );
    }
    let offer = match (offers.pop(), offers.is_empty()) {
        (Some(offer), true) => offer,
        _ => {
            return Err(ShipmentError::not_found(
                ShipmentOffer::ENTITY,
                format!("shipment {shipment_id} for provider {provider_id}"),
            ))
        }
    };
    let shipment = tx.find_shipment(shipment_id).await?;
    Ok((shipment, offer))
}

async fn accept_pair(
    tx: &mut dyn GatewayTransaction,
    provider_id: ProviderId,
    shipment_id: ShipmentId,
) -> ShipmentResult<(Shipment, ShipmentOffer)> {
    let (mut shipment, mut offer) = load_pair(tx, provider_id, shipment_id).await?;
    shipment.accept()?;
    offer.accept()?;
    save_validated(tx, &shipment, Some(&offer)).await?;
    Ok((shipment, offer))
}

async fn reject_pair(
    tx: &mut dyn GatewayTransaction,
    provider_id: ProviderId,
    shipment_id: ShipmentId,
    reason: String,
) -> ShipmentResult<(Shipment, ShipmentOffer)> {
    let (mut shipment, mut offer) = load_pair(tx, provider_id, shipment_id).await?;
    // Only an awarded shipment can be turned down, even though submit also
    // runs from DRAFT.
    if shipment.status() != ShipmentStatus::Awarded {
        return Err(ShipmentError::InvalidTransition {
            entity: Shipment::ENTITY,
            id: shipment.id.to_string(),
            operation: "reject",
            from: shipment.status().name(),
        });
    }
    shipment.submit()?;
    offer.reject(reason)?;
    save_validated(tx, &shipment, Some(&offer)).await?;
    Ok((shipment, offer))
}

async fn award_pair(
    tx: &mut dyn GatewayTransaction,
    shipment_id: ShipmentId,
    provider_id: ProviderId,
) -> ShipmentResult<(Shipment, ShipmentOffer)> {
    let mut shipment = tx.find_shipment(shipment_id).await?;
    // One offer per provider and shipment, whatever its answer was.
    let existing = tx.find_offers_for_provider(provider_id, shipment_id).await?;
    if !existing.is_empty() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "offer.provider_id",
            format!("provider {provider_id} already holds an offer for this shipment"),
        );
        return Err(ShipmentError::Validation(errors));
    }
    shipment.award()?;
    let offer = ShipmentOffer::new(shipment.id, provider_id);
    save_validated(tx, &shipment, Some(&offer)).await?;
    Ok((shipment, offer))
}

/// Validate both records together, then stage them
async fn save_validated(
    tx: &mut dyn GatewayTransaction,
    shipment: &Shipment,
    offer: Option<&ShipmentOffer>,
) -> ShipmentResult<()> {
    let mut errors = ValidationErrors::new();
    errors.merge("shipment", shipment.validate());
    if let Some(offer) = offer {
        errors.merge("offer", offer.validate());
    }
    errors.into_result()?;

    tx.save_shipment(shipment).await?;
    if let Some(offer) = offer {
        tx.save_offer(offer).await?;
    }
    Ok(())
}
