// Copyright 2025 Cowboy AI, LLC.

//! Value Objects shared by shipment records and the scheduler.
//!
//! Value Objects are immutable, compared by value, and updated by replacement.
//! - Pound: a weight in whole pounds
//! - Miles: a transit distance in whole miles
//! - Address: a postal address for pickup or delivery

use crate::validation::{Validate, ValidationErrors};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Weight in whole pounds.
///
/// Signed so that payload values can be carried in and rejected by
/// validation instead of wrapping.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(transparent)]
pub struct Pound(pub i64);

impl Pound {
    /// Raw pound value
    pub fn value(self) -> i64 {
        self.0
    }

    /// Whether the weight is below zero
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl Add for Pound {
    type Output = Pound;

    fn add(self, rhs: Pound) -> Pound {
        Pound(self.0 + rhs.0)
    }
}

impl fmt::Display for Pound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} lbs", self.0)
    }
}

/// Transit distance in whole miles.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(transparent)]
pub struct Miles(pub u32);

impl Miles {
    /// Raw mile value
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Miles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mi", self.0)
    }
}

/// Postal address as a single invariant value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Address {
    street_address_1: String,
    street_address_2: Option<String>,
    city: String,
    state: String,
    postal_code: String,
    country: Option<String>,
}

impl Address {
    /// Construct an address from its required lines
    pub fn new(
        street_address_1: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            street_address_1: street_address_1.into(),
            street_address_2: None,
            city: city.into(),
            state: state.into(),
            postal_code: postal_code.into(),
            country: None,
        }
    }

    /// Return a copy with a second street line
    pub fn with_street_address_2(mut self, line: impl Into<String>) -> Self {
        self.street_address_2 = Some(line.into());
        self
    }

    /// Return a copy with an explicit country
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// First street line
    pub fn street_address_1(&self) -> &str {
        &self.street_address_1
    }
    /// Optional second street line
    pub fn street_address_2(&self) -> Option<&str> {
        self.street_address_2.as_deref()
    }
    /// City
    pub fn city(&self) -> &str {
        &self.city
    }
    /// State or territory code
    pub fn state(&self) -> &str {
        &self.state
    }
    /// ZIP code
    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }
    /// Country, when outside the default
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }
}

impl Validate for Address {
    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require_present("street_address_1", &self.street_address_1);
        errors.require_present("city", &self.city);
        errors.require_present("state", &self.state);
        errors.require_present("postal_code", &self.postal_code);
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pound_arithmetic_and_display() {
        let total = Pound(8000) + Pound(2000) + Pound(500);
        assert_eq!(total, Pound(10500));
        assert_eq!(total.to_string(), "10500 lbs");
        assert!(Pound(-1).is_negative());
        assert!(!Pound(0).is_negative());
    }

    #[test]
    fn test_units_serialize_as_numbers() {
        assert_eq!(serde_json::to_string(&Pound(33)).unwrap(), "33");
        assert_eq!(serde_json::from_str::<Miles>("1200").unwrap(), Miles(1200));
    }

    #[test]
    fn test_address_accessors() {
        let address = Address::new("123 Any Street", "Beverly Hills", "CA", "90210")
            .with_street_address_2("P.O. Box 12345")
            .with_country("US");

        assert_eq!(address.street_address_1(), "123 Any Street");
        assert_eq!(address.street_address_2(), Some("P.O. Box 12345"));
        assert_eq!(address.city(), "Beverly Hills");
        assert_eq!(address.state(), "CA");
        assert_eq!(address.postal_code(), "90210");
        assert_eq!(address.country(), Some("US"));
        assert!(!address.validate().has_any());
    }

    #[test]
    fn test_address_validation_reports_blank_lines() {
        let address = Address::new("", "Fort Gordon", " ", "30813");
        let errors = address.validate();
        assert!(errors.get("street_address_1").is_some());
        assert!(errors.get("state").is_some());
        assert!(errors.get("city").is_none());
    }
}
