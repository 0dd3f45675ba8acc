// Copyright 2025 Cowboy AI, LLC.

//! Error types for shipment lifecycle and scheduling operations

use crate::validation::ValidationErrors;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur in shipment lifecycle and scheduling operations
#[derive(Debug, Clone, Error)]
pub enum ShipmentError {
    /// A guarded operation was attempted from a status that does not allow it
    #[error("Invalid transition: cannot {operation} {entity} {id} from {from}")]
    InvalidTransition {
        /// Record type the operation targeted
        entity: &'static str,
        /// Identifier of the record
        id: String,
        /// Name of the attempted operation
        operation: &'static str,
        /// Status the record was in
        from: &'static str,
    },

    /// Referenced record or provider pairing does not exist or is ambiguous
    #[error("Not found: {entity} with id {id}")]
    NotFound {
        /// Type of record that wasn't found
        entity: &'static str,
        /// Identifier that was searched for
        id: String,
    },

    /// One or more field-level constraints were violated
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// A schedule input required from a record is absent
    #[error("Missing field: {entity} {id} must have a {field}")]
    MissingField {
        /// Type of record missing the field
        entity: &'static str,
        /// Identifier of the record
        id: String,
        /// Name of the missing field
        field: &'static str,
    },

    /// Underlying storage failure
    #[error("Persistence error: {message}")]
    Persistence {
        /// Description of the failure
        message: String,
        /// Whether the caller may retry the operation
        retryable: bool,
    },

    /// Stored version moved on between read and commit
    #[error("Concurrency conflict on {id}: expected version {expected}, but found {actual}")]
    ConcurrencyConflict {
        /// Identifier of the conflicting record
        id: String,
        /// Version the transaction read
        expected: u64,
        /// Version found at commit
        actual: u64,
    },

    /// The caller-supplied transaction bound elapsed before commit
    #[error("Transaction timeout: {operation} did not complete within {timeout_ms}ms")]
    TransactionTimeout {
        /// Coordinator operation that timed out
        operation: &'static str,
        /// Configured bound in milliseconds
        timeout_ms: u64,
    },

    /// A weight estimate is above the service member's entitlement
    #[error("Entitlement exceeded: estimate of {estimate} lbs is above {entitlement} lbs")]
    EntitlementExceeded {
        /// Estimated weight in pounds
        estimate: i64,
        /// Entitlement weight in pounds
        entitlement: i64,
    },

    /// A calendar walk exhausted its search span without accepting a day
    #[error("No workday found within {searched_days} days of {from}")]
    NoWorkdayFound {
        /// Date the walk started from
        from: NaiveDate,
        /// Days inspected before giving up
        searched_days: u32,
    },
}

/// Result type for shipment operations
pub type ShipmentResult<T> = Result<T, ShipmentError>;

impl From<ValidationErrors> for ShipmentError {
    fn from(errors: ValidationErrors) -> Self {
        ShipmentError::Validation(errors)
    }
}

impl ShipmentError {
    /// Create a not-found error for a record
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ShipmentError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Create a persistence error
    pub fn persistence(message: impl Into<String>, retryable: bool) -> Self {
        ShipmentError::Persistence {
            message: message.into(),
            retryable,
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, ShipmentError::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ShipmentError::Validation(_) | ShipmentError::MissingField { .. }
        )
    }

    /// Check if this is a rejected state change
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, ShipmentError::InvalidTransition { .. })
    }

    /// Check if the caller may retry the failed operation unchanged
    pub fn is_retryable(&self) -> bool {
        match self {
            ShipmentError::Persistence { retryable, .. } => *retryable,
            ShipmentError::ConcurrencyConflict { .. }
            | ShipmentError::TransactionTimeout { .. } => true,
            _ => false,
        }
    }

    /// Validation errors carried by this error, if any
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ShipmentError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test error creation and display messages
    #[test]
    fn test_error_display_messages() {
        let err = ShipmentError::InvalidTransition {
            entity: "Shipment",
            id: "123".to_string(),
            operation: "approve",
            from: "SUBMITTED",
        };
        assert_eq!(
            err.to_string(),
            "Invalid transition: cannot approve Shipment 123 from SUBMITTED"
        );

        let err = ShipmentError::not_found("Shipment", "abc");
        assert_eq!(err.to_string(), "Not found: Shipment with id abc");

        let err = ShipmentError::MissingField {
            entity: "Shipment",
            id: "abc".to_string(),
            field: "requested_pickup_date",
        };
        assert_eq!(
            err.to_string(),
            "Missing field: Shipment abc must have a requested_pickup_date"
        );

        let err = ShipmentError::EntitlementExceeded {
            estimate: 9000,
            entitlement: 8000,
        };
        assert_eq!(err.to_string(), "Entitlement exceeded: estimate of 9000 lbs is above 8000 lbs");

        let mut errors = ValidationErrors::new();
        errors.add("point_of_contact", "can not be blank");
        let err = ShipmentError::from(errors);
        assert_eq!(
            err.to_string(),
            "Validation failed: point_of_contact: can not be blank"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(ShipmentError::persistence("connection reset", true).is_retryable());
        assert!(!ShipmentError::persistence("constraint violated", false).is_retryable());
        assert!(ShipmentError::ConcurrencyConflict {
            id: "1".to_string(),
            expected: 1,
            actual: 2,
        }
        .is_retryable());
        assert!(ShipmentError::TransactionTimeout {
            operation: "accept_for_provider",
            timeout_ms: 10,
        }
        .is_retryable());
        assert!(!ShipmentError::not_found("Shipment", "1").is_retryable());
    }

    /// Not found and validation failures must stay distinguishable
    #[test]
    fn test_helper_method_exclusivity() {
        let not_found = ShipmentError::not_found("ShipmentOffer", "1");
        assert!(not_found.is_not_found());
        assert!(!not_found.is_validation_error());
        assert!(!not_found.is_invalid_transition());

        let validation = ShipmentError::Validation(ValidationErrors::new());
        assert!(validation.is_validation_error());
        assert!(!validation.is_not_found());
        assert!(validation.validation_errors().is_some());

        let missing = ShipmentError::MissingField {
            entity: "Shipment",
            id: "1".to_string(),
            field: "estimated_pack_days",
        };
        assert!(missing.is_validation_error());
        assert!(missing.validation_errors().is_none());
    }
}
