// Copyright 2025 Cowboy AI, LLC.

//! Shipments and their guarded lifecycle
//!
//! A [`Shipment`] is the unit of work a transportation service provider
//! moves. Its status is private: the only way to change it is one of the
//! guarded operations ([`Shipment::submit`], [`Shipment::award`], ...), each
//! of which refuses to run from a status the transition table does not list
//! and leaves the record untouched when it refuses.

mod status;

pub use status::{ShipmentStatus, ShipmentTransition};

use crate::domain::{Address, Pound};
use crate::entity::{AggregateRoot, MoveId, ShipmentId, TrafficDistributionListId};
use crate::errors::ShipmentResult;
use crate::state_machine::{apply_transition, StateTransition};
use crate::validation::{Validate, ValidationErrors};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the pre-move survey was carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurveyMethod {
    /// Survey over the phone
    Phone,
    /// Survey over video call
    Video,
}

/// Provider's pre-move survey results.
///
/// Used both as the stored survey on a shipment and as a patch: when applied,
/// only the `Some` fields overwrite what is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PmSurvey {
    /// Planned first pack date
    pub planned_pack_date: Option<NaiveDate>,
    /// Planned pickup date
    pub planned_pickup_date: Option<NaiveDate>,
    /// Planned delivery date
    pub planned_delivery_date: Option<NaiveDate>,
    /// Surveyed household goods weight
    pub weight_estimate: Option<Pound>,
    /// Surveyed professional gear weight
    pub progear_weight_estimate: Option<Pound>,
    /// Surveyed spouse professional gear weight
    pub spouse_progear_weight_estimate: Option<Pound>,
    /// Free-form notes
    pub notes: Option<String>,
    /// How the survey was conducted
    pub method: Option<SurveyMethod>,
}

impl PmSurvey {
    fn merge(&mut self, patch: PmSurvey) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }
        take(&mut self.planned_pack_date, patch.planned_pack_date);
        take(&mut self.planned_pickup_date, patch.planned_pickup_date);
        take(&mut self.planned_delivery_date, patch.planned_delivery_date);
        take(&mut self.weight_estimate, patch.weight_estimate);
        take(&mut self.progear_weight_estimate, patch.progear_weight_estimate);
        take(
            &mut self.spouse_progear_weight_estimate,
            patch.spouse_progear_weight_estimate,
        );
        take(&mut self.notes, patch.notes);
        take(&mut self.method, patch.method);
    }
}

/// A single shipment within a service member's move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    /// Unique identifier
    pub id: ShipmentId,
    /// Move this shipment belongs to
    pub move_id: MoveId,
    /// Traffic distribution list the shipment was routed through
    pub traffic_distribution_list_id: Option<TrafficDistributionListId>,
    status: ShipmentStatus,
    version: u64,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the record last changed
    pub updated_at: DateTime<Utc>,

    /// Pickup date the service member asked for
    pub requested_pickup_date: Option<NaiveDate>,
    /// Scheduled pickup date
    pub pickup_date: Option<NaiveDate>,
    /// Scheduled delivery date
    pub delivery_date: Option<NaiveDate>,
    /// Date the shipment was booked with a provider
    pub book_date: Option<NaiveDate>,

    /// Estimated number of packing days
    pub estimated_pack_days: Option<i64>,
    /// Estimated number of transit days
    pub estimated_transit_days: Option<i64>,
    /// Household goods weight estimate
    pub weight_estimate: Option<Pound>,
    /// Professional gear weight estimate
    pub progear_weight_estimate: Option<Pound>,
    /// Spouse professional gear weight estimate
    pub spouse_progear_weight_estimate: Option<Pound>,
    /// Weighed shipment weight
    pub actual_weight: Option<Pound>,

    /// Provider's pre-move survey
    pub pm_survey: PmSurvey,

    /// Primary pickup address
    pub pickup_address: Option<Address>,
    has_secondary_pickup_address: bool,
    secondary_pickup_address: Option<Address>,
    has_delivery_address: bool,
    delivery_address: Option<Address>,
    has_partial_sit_delivery_address: bool,
    partial_sit_delivery_address: Option<Address>,
}

impl Shipment {
    /// Entity name used in errors and logs
    pub const ENTITY: &'static str = "Shipment";

    /// Create a draft shipment for a move
    pub fn new(move_id: MoveId) -> Self {
        let now = Utc::now();
        Self {
            id: ShipmentId::new(),
            move_id,
            traffic_distribution_list_id: None,
            status: ShipmentStatus::Draft,
            version: 0,
            created_at: now,
            updated_at: now,
            requested_pickup_date: None,
            pickup_date: None,
            delivery_date: None,
            book_date: None,
            estimated_pack_days: None,
            estimated_transit_days: None,
            weight_estimate: None,
            progear_weight_estimate: None,
            spouse_progear_weight_estimate: None,
            actual_weight: None,
            pm_survey: PmSurvey::default(),
            pickup_address: None,
            has_secondary_pickup_address: false,
            secondary_pickup_address: None,
            has_delivery_address: false,
            delivery_address: None,
            has_partial_sit_delivery_address: false,
            partial_sit_delivery_address: None,
        }
    }

    /// Current status
    pub fn status(&self) -> ShipmentStatus {
        self.status
    }

    /// Send the shipment for award. Allowed from DRAFT, and from AWARDED
    /// when the provider turned the offer down.
    pub fn submit(&mut self) -> ShipmentResult<StateTransition<ShipmentStatus>> {
        self.transition(ShipmentTransition::Submit)
    }

    /// Award the shipment to a provider. Books it if it was not booked yet.
    pub fn award(&mut self) -> ShipmentResult<StateTransition<ShipmentStatus>> {
        let transition = self.transition(ShipmentTransition::Award)?;
        if self.book_date.is_none() {
            self.book_date = Some(transition.timestamp.date_naive());
        }
        Ok(transition)
    }

    /// Provider accepts the awarded shipment
    pub fn accept(&mut self) -> ShipmentResult<StateTransition<ShipmentStatus>> {
        self.transition(ShipmentTransition::Accept)
    }

    /// Approve an accepted shipment
    pub fn approve(&mut self) -> ShipmentResult<StateTransition<ShipmentStatus>> {
        self.transition(ShipmentTransition::Approve)
    }

    /// Goods were picked up
    pub fn begin(&mut self) -> ShipmentResult<StateTransition<ShipmentStatus>> {
        self.transition(ShipmentTransition::Begin)
    }

    /// Goods were delivered
    pub fn deliver(&mut self) -> ShipmentResult<StateTransition<ShipmentStatus>> {
        self.transition(ShipmentTransition::Deliver)
    }

    /// Close out a delivered shipment
    pub fn complete(&mut self) -> ShipmentResult<StateTransition<ShipmentStatus>> {
        self.transition(ShipmentTransition::Complete)
    }

    fn transition(
        &mut self,
        op: ShipmentTransition,
    ) -> ShipmentResult<StateTransition<ShipmentStatus>> {
        let transition = apply_transition(Self::ENTITY, self.id, &mut self.status, op)?;
        self.updated_at = transition.timestamp;
        self.increment_version();
        Ok(transition)
    }

    /// Copy every surveyed value present in `patch` onto the shipment
    pub fn apply_pm_survey(&mut self, patch: PmSurvey) {
        self.pm_survey.merge(patch);
        self.updated_at = Utc::now();
        self.increment_version();
    }

    /// Whether a secondary pickup address is expected
    pub fn has_secondary_pickup_address(&self) -> bool {
        self.has_secondary_pickup_address
    }

    /// Secondary pickup address, when flagged and supplied
    pub fn secondary_pickup_address(&self) -> Option<&Address> {
        self.secondary_pickup_address.as_ref()
    }

    /// Set the secondary pickup slot. The address is kept only when `has`
    /// is true and an address is supplied.
    pub fn set_secondary_pickup_address(&mut self, has: bool, address: Option<Address>) {
        self.has_secondary_pickup_address = has;
        self.secondary_pickup_address = address.filter(|_| has);
    }

    /// Whether a delivery address is expected
    pub fn has_delivery_address(&self) -> bool {
        self.has_delivery_address
    }

    /// Delivery address, when flagged and supplied
    pub fn delivery_address(&self) -> Option<&Address> {
        self.delivery_address.as_ref()
    }

    /// Set the delivery slot. The address is kept only when `has` is true
    /// and an address is supplied.
    pub fn set_delivery_address(&mut self, has: bool, address: Option<Address>) {
        self.has_delivery_address = has;
        self.delivery_address = address.filter(|_| has);
    }

    /// Whether a partial storage-in-transit delivery address is expected
    pub fn has_partial_sit_delivery_address(&self) -> bool {
        self.has_partial_sit_delivery_address
    }

    /// Partial storage-in-transit delivery address, when flagged and supplied
    pub fn partial_sit_delivery_address(&self) -> Option<&Address> {
        self.partial_sit_delivery_address.as_ref()
    }

    /// Set the partial storage-in-transit delivery slot. The address is kept
    /// only when `has` is true and an address is supplied.
    pub fn set_partial_sit_delivery_address(&mut self, has: bool, address: Option<Address>) {
        self.has_partial_sit_delivery_address = has;
        self.partial_sit_delivery_address = address.filter(|_| has);
    }
}

impl AggregateRoot for Shipment {
    type Id = ShipmentId;

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

impl Validate for Shipment {
    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        errors.require_non_negative("estimated_pack_days", self.estimated_pack_days);
        errors.require_non_negative("estimated_transit_days", self.estimated_transit_days);

        let weights = [
            ("weight_estimate", self.weight_estimate),
            ("progear_weight_estimate", self.progear_weight_estimate),
            ("spouse_progear_weight_estimate", self.spouse_progear_weight_estimate),
            ("actual_weight", self.actual_weight),
            ("pm_survey_weight_estimate", self.pm_survey.weight_estimate),
            ("pm_survey_progear_weight_estimate", self.pm_survey.progear_weight_estimate),
            (
                "pm_survey_spouse_progear_weight_estimate",
                self.pm_survey.spouse_progear_weight_estimate,
            ),
        ];
        for (field, weight) in weights {
            errors.require_non_negative(field, weight.map(Pound::value));
        }

        match &self.pickup_address {
            Some(address) => errors.merge("pickup_address", address.validate()),
            None if self.status.is_offered() => {
                errors.add("pickup_address", "is required once the shipment is offered")
            }
            None => {}
        }

        let slots = [
            (
                "secondary_pickup_address",
                self.has_secondary_pickup_address,
                &self.secondary_pickup_address,
            ),
            ("delivery_address", self.has_delivery_address, &self.delivery_address),
            (
                "partial_sit_delivery_address",
                self.has_partial_sit_delivery_address,
                &self.partial_sit_delivery_address,
            ),
        ];
        for (field, has, address) in slots {
            match (has, address) {
                (true, Some(address)) => errors.merge(field, address.validate()),
                (true, None) => errors.add(field, "is required when flagged as present"),
                (false, Some(_)) => errors.add(field, "must be empty when not flagged as present"),
                (false, None) => {}
            }
        }

        errors
    }
}

impl fmt::Display for Shipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
