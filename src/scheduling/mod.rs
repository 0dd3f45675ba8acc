// Copyright 2025 Cowboy AI, LLC.

//! Move date scheduling
//!
//! Pure calendar arithmetic: a [`BusinessCalendar`] says which days are
//! workdays, an [`EntitlementCalculator`] turns weights and distances into
//! day counts, and a [`MoveDateScheduler`] lays the counts out as date
//! windows around a pickup date.

pub mod calendar;
pub mod entitlements;
pub mod move_dates;

pub use calendar::{is_weekend, BusinessCalendar, CalendarConfig, UsFederalCalendar};
pub use entitlements::{
    validate_weight_estimate, EntitlementCalculator, Rank, StandardEntitlements, WeightAllotment,
};
pub use move_dates::{
    dates_backward_from, dates_forward_from, unavailable_move_dates, walk_dates,
    MoveDateScheduler, MoveDatesSummary, MoveOrders, SchedulerConfig, WalkDirection,
    DEFAULT_MAX_WALK_SPAN_DAYS,
};
