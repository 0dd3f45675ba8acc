// Copyright 2025 Cowboy AI, LLC.

//! Points of contact at either end of a shipment

use crate::entity::{ServiceAgentId, ShipmentId};
use crate::errors::{ShipmentError, ShipmentResult};
use crate::validation::{Validate, ValidationErrors};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Which end of the shipment an agent covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceAgentRole {
    /// Pickup side
    Origin,
    /// Delivery side
    Destination,
}

/// Payload for creating a service agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewServiceAgent {
    /// Which end the agent covers
    pub role: Option<ServiceAgentRole>,
    /// Name of the contact
    pub point_of_contact: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone number
    pub phone_number: Option<String>,
    /// Contact fax number
    pub fax_number: Option<String>,
    /// Contact prefers email
    pub email_is_preferred: Option<bool>,
    /// Contact prefers phone
    pub phone_is_preferred: Option<bool>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// A named contact assigned to a shipment. Never changed after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAgent {
    /// Unique identifier
    pub id: ServiceAgentId,
    /// Shipment the agent is assigned to
    pub shipment_id: ShipmentId,
    /// Which end the agent covers
    pub role: ServiceAgentRole,
    /// Name of the contact
    pub point_of_contact: String,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone number
    pub phone_number: Option<String>,
    /// Contact fax number
    pub fax_number: Option<String>,
    /// Contact prefers email
    pub email_is_preferred: Option<bool>,
    /// Contact prefers phone
    pub phone_is_preferred: Option<bool>,
    /// Free-form notes
    pub notes: Option<String>,
    /// When the agent was recorded
    pub created_at: DateTime<Utc>,
}

impl ServiceAgent {
    /// Entity name used in errors and logs
    pub const ENTITY: &'static str = "ServiceAgent";

    /// Build a validated agent for a shipment from a creation payload
    pub fn create(shipment_id: ShipmentId, input: NewServiceAgent) -> ShipmentResult<Self> {
        let mut errors = ValidationErrors::new();
        if input.role.is_none() {
            errors.add("role", "can not be blank");
        }
        let point_of_contact = input.point_of_contact.unwrap_or_default();
        errors.require_present("point_of_contact", &point_of_contact);

        let role = match (input.role, errors.has_any()) {
            (Some(role), false) => role,
            _ => {
                warn!(%shipment_id, %errors, "service agent failed validation");
                return Err(ShipmentError::Validation(errors));
            }
        };

        Ok(Self {
            id: ServiceAgentId::new(),
            shipment_id,
            role,
            point_of_contact,
            email: input.email,
            phone_number: input.phone_number,
            fax_number: input.fax_number,
            email_is_preferred: input.email_is_preferred,
            phone_is_preferred: input.phone_is_preferred,
            notes: input.notes,
            created_at: Utc::now(),
        })
    }
}

impl Validate for ServiceAgent {
    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require_present("point_of_contact", &self.point_of_contact);
        errors
    }
}
