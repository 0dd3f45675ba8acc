// Copyright 2025 Cowboy AI, LLC.

//! Engine configuration
//!
//! All settings are optional; anything left out of the JSON document takes
//! its default.

use crate::coordinator::CoordinatorConfig;
use crate::errors::{ShipmentError, ShipmentResult};
use crate::scheduling::{CalendarConfig, SchedulerConfig};
use crate::validation::ValidationErrors;
use serde::{Deserialize, Serialize};

/// Settings for every component of the engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Transaction bounds
    pub coordinator: CoordinatorConfig,
    /// Holiday rules
    pub calendar: CalendarConfig,
    /// Calendar walk limits
    pub scheduler: SchedulerConfig,
}

impl EngineConfig {
    /// Parse from a JSON document
    pub fn from_json_str(json: &str) -> ShipmentResult<Self> {
        serde_json::from_str(json).map_err(config_error)
    }

    /// Parse from an already decoded JSON value
    pub fn from_json_value(value: serde_json::Value) -> ShipmentResult<Self> {
        serde_json::from_value(value).map_err(config_error)
    }
}

fn config_error(error: serde_json::Error) -> ShipmentError {
    let mut errors = ValidationErrors::new();
    errors.add("config", error.to_string());
    ShipmentError::Validation(errors)
}
