// Copyright 2025 Cowboy AI, LLC.

//! Shared value objects for shipment records and scheduling

pub mod value_objects;

pub use value_objects::{Address, Miles, Pound};
