// Copyright 2025 Cowboy AI, LLC.

//! Field-level validation collected before persistence
//!
//! Records report every violated constraint at once so a caller sees the
//! complete picture in a single round trip.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered map of field name to the messages reported against it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    errors: IndexMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Create an empty error set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Whether any error was recorded
    pub fn has_any(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of fields with at least one error
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether no error was recorded
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages recorded for a field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    /// Field names in the order they were first reported
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// Fold another record's errors in, prefixing each field with `namespace.`
    pub fn merge(&mut self, namespace: &str, other: ValidationErrors) {
        for (field, messages) in other.errors {
            let key = format!("{namespace}.{field}");
            self.errors.entry(key).or_default().extend(messages);
        }
    }

    /// `Ok(())` when empty, otherwise the errors themselves
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.has_any() {
            Err(self)
        } else {
            Ok(())
        }
    }

    pub(crate) fn require_non_negative(&mut self, field: &str, value: Option<i64>) {
        if let Some(v) = value {
            if v < 0 {
                self.add(field, format!("{v} is less than zero"));
            }
        }
    }

    pub(crate) fn require_present(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "can not be blank");
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.errors {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Records that check their own field-level constraints
pub trait Validate {
    /// Collect every violated constraint; empty when the record is valid
    fn validate(&self) -> ValidationErrors;
}
