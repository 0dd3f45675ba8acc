// Copyright 2025 Cowboy AI, LLC.

//! Pack, pickup, transit and delivery date windows
//!
//! Every window is produced by [`walk_dates`], which steps one calendar day
//! at a time in either direction and keeps the days its inclusion rule
//! accepts. Pack, pickup and delivery windows keep workdays only; the transit
//! window keeps every day because trucks travel through weekends.

use super::calendar::BusinessCalendar;
use super::entitlements::{EntitlementCalculator, Rank};
use crate::domain::{Miles, Pound};
use crate::errors::{ShipmentError, ShipmentResult};
use crate::shipment::Shipment;
use crate::validation::ValidationErrors;
use chrono::{Days, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default bound on consecutive rejected days before a walk gives up
pub const DEFAULT_MAX_WALK_SPAN_DAYS: u32 = 366;

/// Calendar days scanned by [`unavailable_move_dates`]
const UNAVAILABLE_SCAN_DAYS: u64 = 90;

/// Leading workdays too close to book a move on
const SHORT_FUSE_WORKDAYS: usize = 5;

/// Direction of a calendar walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkDirection {
    /// Toward later dates
    Forward,
    /// Toward earlier dates
    Backward,
}

impl WalkDirection {
    fn step(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            WalkDirection::Forward => date.checked_add_days(Days::new(1)),
            WalkDirection::Backward => date.checked_sub_days(Days::new(1)),
        }
    }
}

/// Collect `count` dates starting at `start` and stepping in `direction`.
///
/// A day is kept when `include_non_workdays` is set or the calendar calls it
/// a workday. The result is always ascending, so a backward walk ends with
/// `start` when `start` itself was kept. A `count` of zero returns an empty
/// list without consulting the calendar. A `count` above `max_span` is a
/// [`ShipmentError::Validation`] error on `count`. The walk fails with
/// [`ShipmentError::NoWorkdayFound`] after `max_span` consecutive rejected
/// days or when it runs off the representable date range.
pub fn walk_dates<C>(
    calendar: &C,
    start: NaiveDate,
    direction: WalkDirection,
    count: usize,
    include_non_workdays: bool,
    max_span: u32,
) -> ShipmentResult<Vec<NaiveDate>>
where
    C: BusinessCalendar + ?Sized,
{
    if count == 0 {
        return Ok(Vec::new());
    }
    if count > max_span as usize {
        let mut errors = ValidationErrors::new();
        errors.add("count", format!("{count} is more than the {max_span} day walk limit"));
        return Err(ShipmentError::Validation(errors));
    }

    let mut dates = Vec::with_capacity(count);

    let mut day = start;
    let mut rejected_run = 0u32;
    loop {
        if include_non_workdays || calendar.is_workday(day) {
            dates.push(day);
            rejected_run = 0;
            if dates.len() == count {
                break;
            }
        } else {
            rejected_run += 1;
            if rejected_run >= max_span {
                return Err(ShipmentError::NoWorkdayFound {
                    from: start,
                    searched_days: rejected_run,
                });
            }
        }
        day = direction.step(day).ok_or(ShipmentError::NoWorkdayFound {
            from: start,
            searched_days: rejected_run,
        })?;
    }

    if direction == WalkDirection::Backward {
        dates.reverse();
    }
    Ok(dates)
}

/// `count` accepted dates from `start` onward, ascending
pub fn dates_forward_from<C>(
    calendar: &C,
    start: NaiveDate,
    count: usize,
    include_non_workdays: bool,
) -> ShipmentResult<Vec<NaiveDate>>
where
    C: BusinessCalendar + ?Sized,
{
    walk_dates(
        calendar,
        start,
        WalkDirection::Forward,
        count,
        include_non_workdays,
        DEFAULT_MAX_WALK_SPAN_DAYS,
    )
}

/// `count` accepted dates ending at or before `end`, ascending
pub fn dates_backward_from<C>(
    calendar: &C,
    end: NaiveDate,
    count: usize,
    include_non_workdays: bool,
) -> ShipmentResult<Vec<NaiveDate>>
where
    C: BusinessCalendar + ?Sized,
{
    walk_dates(
        calendar,
        end,
        WalkDirection::Backward,
        count,
        include_non_workdays,
        DEFAULT_MAX_WALK_SPAN_DAYS,
    )
}

/// Dates a move cannot be booked on, scanning 90 days from `start`.
///
/// Non-workdays are always unavailable, and so are the first five workdays
/// because they fall inside the short-fuse window.
pub fn unavailable_move_dates<C>(calendar: &C, start: NaiveDate) -> Vec<NaiveDate>
where
    C: BusinessCalendar + ?Sized,
{
    let mut short_fuse_days = 0;
    start
        .iter_days()
        .take(UNAVAILABLE_SCAN_DAYS as usize)
        .filter(|day| {
            if !calendar.is_workday(*day) {
                return true;
            }
            if short_fuse_days < SHORT_FUSE_WORKDAYS {
                short_fuse_days += 1;
                return true;
            }
            false
        })
        .collect()
}

/// Date windows of one move. Derived fresh on every computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MoveDatesSummary {
    /// Workdays the movers pack, ending the day before pickup
    pub pack_days: Vec<NaiveDate>,
    /// The pickup workday
    pub pickup_days: Vec<NaiveDate>,
    /// Calendar days on the road
    pub transit_days: Vec<NaiveDate>,
    /// The delivery workday
    pub delivery_days: Vec<NaiveDate>,
    /// Date the service member must report by
    pub report_days: Vec<NaiveDate>,
}

/// The parts of a set of orders the scheduler reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOrders {
    /// Service member's pay grade
    pub rank: Rank,
    /// Whether dependents are authorized on the orders
    pub has_dependents: bool,
    /// Whether the spouse ships professional gear
    pub spouse_has_pro_gear: bool,
    /// Date the service member must report by
    pub report_by_date: NaiveDate,
}

/// Scheduler settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Consecutive non-workdays a walk tolerates before failing
    pub max_walk_span_days: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_walk_span_days: DEFAULT_MAX_WALK_SPAN_DAYS,
        }
    }
}

/// Derives move date windows from a calendar and entitlement tables
#[derive(Debug, Clone)]
pub struct MoveDateScheduler<C, E> {
    calendar: C,
    entitlements: E,
    config: SchedulerConfig,
}

impl<C: BusinessCalendar, E: EntitlementCalculator> MoveDateScheduler<C, E> {
    /// Scheduler with default settings
    pub fn new(calendar: C, entitlements: E) -> Self {
        Self::with_config(calendar, entitlements, SchedulerConfig::default())
    }

    /// Scheduler with explicit settings
    pub fn with_config(calendar: C, entitlements: E, config: SchedulerConfig) -> Self {
        Self {
            calendar,
            entitlements,
            config,
        }
    }

    /// Calendar the scheduler walks
    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    /// Entitlement tables the scheduler reads
    pub fn entitlements(&self) -> &E {
        &self.entitlements
    }

    /// `count` accepted dates from `start` onward, ascending
    pub fn dates_forward_from(
        &self,
        start: NaiveDate,
        count: usize,
        include_non_workdays: bool,
    ) -> ShipmentResult<Vec<NaiveDate>> {
        self.walk(start, WalkDirection::Forward, count, include_non_workdays)
    }

    /// `count` accepted dates ending at or before `end`, ascending
    pub fn dates_backward_from(
        &self,
        end: NaiveDate,
        count: usize,
        include_non_workdays: bool,
    ) -> ShipmentResult<Vec<NaiveDate>> {
        self.walk(end, WalkDirection::Backward, count, include_non_workdays)
    }

    /// Windows for a move of `entitlement_weight` over `transit_distance`,
    /// picked up on `move_date`
    pub fn compute_move_dates_for_weight(
        &self,
        entitlement_weight: Pound,
        transit_distance: Miles,
        move_date: NaiveDate,
        report_by_date: NaiveDate,
    ) -> ShipmentResult<MoveDatesSummary> {
        let transit_days = self
            .entitlements
            .transit_days(entitlement_weight, transit_distance)?;
        let pack_days = self.entitlements.pack_days(entitlement_weight);
        debug!(
            %entitlement_weight,
            %transit_distance,
            %move_date,
            pack_days,
            transit_days,
            "computing move dates"
        );
        self.summarize(
            move_date,
            pack_days as usize,
            transit_days as usize,
            vec![report_by_date],
        )
    }

    /// Windows for a move under `orders`, with the entitlement weight derived
    /// from rank and dependents
    pub fn compute_move_dates(
        &self,
        orders: &MoveOrders,
        transit_distance: Miles,
        move_date: NaiveDate,
    ) -> ShipmentResult<MoveDatesSummary> {
        let weight = self.entitlements.entitlement_weight(
            orders.rank,
            orders.has_dependents,
            orders.spouse_has_pro_gear,
        );
        self.compute_move_dates_for_weight(
            weight,
            transit_distance,
            move_date,
            orders.report_by_date,
        )
    }

    /// Windows from the shipment's own requested pickup date and estimates.
    ///
    /// The report window is empty because a shipment carries no orders.
    pub fn compute_move_dates_from_shipment(
        &self,
        shipment: &Shipment,
    ) -> ShipmentResult<MoveDatesSummary> {
        let missing = |field: &'static str| ShipmentError::MissingField {
            entity: Shipment::ENTITY,
            id: shipment.id.to_string(),
            field,
        };
        let anchor = shipment
            .requested_pickup_date
            .ok_or_else(|| missing("requested_pickup_date"))?;
        let pack_days = shipment
            .estimated_pack_days
            .ok_or_else(|| missing("estimated_pack_days"))?;
        let transit_days = shipment
            .estimated_transit_days
            .ok_or_else(|| missing("estimated_transit_days"))?;

        let mut errors = ValidationErrors::new();
        errors.require_non_negative("estimated_pack_days", Some(pack_days));
        errors.require_non_negative("estimated_transit_days", Some(transit_days));
        let limit = i64::from(self.config.max_walk_span_days);
        for (field, days) in [
            ("estimated_pack_days", pack_days),
            ("estimated_transit_days", transit_days),
        ] {
            if days > limit {
                errors.add(field, format!("{days} is more than {limit} days"));
            }
        }
        errors.into_result()?;

        debug!(
            shipment_id = %shipment.id,
            %anchor,
            pack_days,
            transit_days,
            "computing move dates from shipment"
        );
        self.summarize(
            anchor,
            day_count(pack_days),
            day_count(transit_days),
            Vec::new(),
        )
    }

    fn summarize(
        &self,
        anchor: NaiveDate,
        pack_count: usize,
        transit_count: usize,
        report_days: Vec<NaiveDate>,
    ) -> ShipmentResult<MoveDatesSummary> {
        let last_pack_day = previous_day(anchor)?;
        let pack_days = self.dates_backward_from(last_pack_day, pack_count, false)?;
        let pickup_days = self.dates_forward_from(anchor, 1, false)?;

        let transit_anchor = next_day(pickup_days.last().copied().unwrap_or(anchor))?;
        let transit_days = self.dates_forward_from(transit_anchor, transit_count, true)?;

        // With no transit days the delivery walk starts at the transit anchor.
        let delivery_anchor = match transit_days.last() {
            Some(last) => next_day(*last)?,
            None => transit_anchor,
        };
        let delivery_days = self.dates_forward_from(delivery_anchor, 1, false)?;

        Ok(MoveDatesSummary {
            pack_days,
            pickup_days,
            transit_days,
            delivery_days,
            report_days,
        })
    }

    fn walk(
        &self,
        start: NaiveDate,
        direction: WalkDirection,
        count: usize,
        include_non_workdays: bool,
    ) -> ShipmentResult<Vec<NaiveDate>> {
        walk_dates(
            &self.calendar,
            start,
            direction,
            count,
            include_non_workdays,
            self.config.max_walk_span_days,
        )
    }
}

fn day_count(days: i64) -> usize {
    usize::try_from(days).unwrap_or(0)
}

fn next_day(date: NaiveDate) -> ShipmentResult<NaiveDate> {
    date.succ_opt().ok_or(ShipmentError::NoWorkdayFound {
        from: date,
        searched_days: 0,
    })
}

fn previous_day(date: NaiveDate) -> ShipmentResult<NaiveDate> {
    date.pred_opt().ok_or(ShipmentError::NoWorkdayFound {
        from: date,
        searched_days: 0,
    })
}
