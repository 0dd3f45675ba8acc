//! Date window properties and scenarios

use chrono::{Datelike, Days, NaiveDate, Weekday};
use mockall::mock;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use shipment_lifecycle::scheduling::{
    dates_backward_from, dates_forward_from, walk_dates, WalkDirection,
};
use shipment_lifecycle::{
    BusinessCalendar, EntitlementCalculator, Miles, MoveDateScheduler, MoveOrders, Pound, Rank,
    ShipmentError, ShipmentResult, StandardEntitlements, UsFederalCalendar,
};

mock! {
    pub Calendar {}
    impl BusinessCalendar for Calendar {
        fn is_workday(&self, date: NaiveDate) -> bool;
    }
}

mock! {
    pub Entitlements {}
    impl EntitlementCalculator for Entitlements {
        fn entitlement_weight(
            &self,
            rank: Rank,
            has_dependents: bool,
            spouse_has_pro_gear: bool,
        ) -> Pound;
        fn pack_days(&self, weight: Pound) -> u32;
        fn transit_days(&self, weight: Pound, distance: Miles) -> ShipmentResult<u32>;
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn weekdays_only() -> MockCalendar {
    let mut calendar = MockCalendar::new();
    calendar
        .expect_is_workday()
        .returning(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun));
    calendar
}

fn entitlements(pack: u32, transit: u32) -> MockEntitlements {
    let mut entitlements = MockEntitlements::new();
    entitlements
        .expect_pack_days()
        .with(eq(Pound(8000)))
        .return_const(pack);
    entitlements
        .expect_transit_days()
        .with(eq(Pound(8000)), eq(Miles(500)))
        .returning(move |_, _| Ok(transit));
    entitlements
}

#[test]
fn wednesday_pickup_scenario() {
    let scheduler = MoveDateScheduler::new(weekdays_only(), entitlements(2, 5));

    let summary = scheduler
        .compute_move_dates_for_weight(Pound(8000), Miles(500), date(2018, 6, 13), date(2018, 8, 1))
        .unwrap();

    assert_eq!(summary.pack_days, vec![date(2018, 6, 11), date(2018, 6, 12)]);
    assert_eq!(summary.pickup_days, vec![date(2018, 6, 13)]);
    assert_eq!(
        summary.transit_days,
        vec![
            date(2018, 6, 14),
            date(2018, 6, 15),
            date(2018, 6, 16),
            date(2018, 6, 17),
            date(2018, 6, 18),
        ]
    );
    assert_eq!(summary.delivery_days, vec![date(2018, 6, 19)]);
    assert_eq!(summary.report_days, vec![date(2018, 8, 1)]);
}

/// A non-workday pickup is not corrected; pickup moves to the next workday
/// and packing stays anchored before the requested date
#[test]
fn saturday_anchor_yields_one_pickup_day() {
    let scheduler = MoveDateScheduler::new(weekdays_only(), entitlements(2, 5));

    let summary = scheduler
        .compute_move_dates_for_weight(Pound(8000), Miles(500), date(2018, 6, 16), date(2018, 8, 1))
        .unwrap();

    assert_eq!(summary.pickup_days, vec![date(2018, 6, 18)]);
    assert_eq!(summary.pack_days, vec![date(2018, 6, 14), date(2018, 6, 15)]);
    assert_eq!(summary.transit_days[0], date(2018, 6, 19));
}

#[test]
fn zero_transit_days_deliver_from_transit_anchor() {
    let scheduler = MoveDateScheduler::new(weekdays_only(), entitlements(1, 0));

    let summary = scheduler
        .compute_move_dates_for_weight(Pound(8000), Miles(500), date(2018, 6, 15), date(2018, 8, 1))
        .unwrap();

    assert_eq!(summary.pickup_days, vec![date(2018, 6, 15)]);
    assert!(summary.transit_days.is_empty());
    // Saturday after a Friday pickup is skipped
    assert_eq!(summary.delivery_days, vec![date(2018, 6, 18)]);
}

#[test]
fn orders_drive_entitlement_lookup() {
    let mut entitlements = entitlements(3, 9);
    entitlements
        .expect_entitlement_weight()
        .with(eq(Rank::E5), eq(true), eq(false))
        .times(1)
        .return_const(Pound(8000));
    let scheduler = MoveDateScheduler::new(weekdays_only(), entitlements);
    let orders = MoveOrders {
        rank: Rank::E5,
        has_dependents: true,
        spouse_has_pro_gear: false,
        report_by_date: date(2018, 9, 4),
    };

    let summary = scheduler
        .compute_move_dates(&orders, Miles(500), date(2018, 6, 13))
        .unwrap();
    assert_eq!(summary.pack_days.len(), 3);
    assert_eq!(summary.transit_days.len(), 9);
    assert_eq!(summary.report_days, vec![date(2018, 9, 4)]);
}

#[test]
fn transit_lookup_failure_is_returned() {
    let mut entitlements = MockEntitlements::new();
    entitlements.expect_pack_days().never();
    entitlements
        .expect_transit_days()
        .returning(|_, _| Err(ShipmentError::persistence("tariff table unavailable", true)));
    let scheduler = MoveDateScheduler::new(weekdays_only(), entitlements);

    let err = scheduler
        .compute_move_dates_for_weight(Pound(8000), Miles(500), date(2018, 6, 13), date(2018, 8, 1))
        .unwrap_err();
    assert!(err.is_retryable());
}

#[test]
fn zero_count_walk_never_consults_calendar() {
    let mut calendar = MockCalendar::new();
    calendar.expect_is_workday().never();

    assert!(dates_forward_from(&calendar, date(2018, 6, 13), 0, false).unwrap().is_empty());
    assert!(dates_backward_from(&calendar, date(2018, 6, 13), 0, false).unwrap().is_empty());
}

#[test]
fn walk_over_closed_calendar_is_bounded() {
    let mut calendar = MockCalendar::new();
    calendar.expect_is_workday().times(30).return_const(false);

    let err = walk_dates(&calendar, date(2018, 6, 13), WalkDirection::Forward, 1, false, 30)
        .unwrap_err();
    assert!(matches!(err, ShipmentError::NoWorkdayFound { searched_days: 30, .. }));
}

#[test]
fn holidays_are_skipped_by_pack_window() {
    let scheduler = MoveDateScheduler::new(UsFederalCalendar::new(), StandardEntitlements);

    // Tuesday after Memorial Day 2018; 8,000 lbs packs in 3 days
    let summary = scheduler
        .compute_move_dates_for_weight(Pound(8000), Miles(100), date(2018, 5, 29), date(2018, 8, 1))
        .unwrap();
    assert_eq!(
        summary.pack_days,
        vec![date(2018, 5, 23), date(2018, 5, 24), date(2018, 5, 25)]
    );
    assert_eq!(summary.pickup_days, vec![date(2018, 5, 29)]);
}

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..20_000).prop_map(|offset| date(2000, 1, 1) + Days::new(offset))
}

proptest! {
    #[test]
    fn forward_with_non_workdays_is_consecutive(start in any_date(), n in 0usize..60) {
        let calendar = UsFederalCalendar::new();
        let dates = dates_forward_from(&calendar, start, n, true).unwrap();
        let expected: Vec<NaiveDate> = start.iter_days().take(n).collect();
        prop_assert_eq!(dates, expected);
    }

    #[test]
    fn forward_workdays_skip_only_non_workdays(start in any_date(), n in 0usize..40) {
        let calendar = UsFederalCalendar::new();
        let dates = dates_forward_from(&calendar, start, n, false).unwrap();
        prop_assert_eq!(dates.len(), n);
        prop_assert!(dates.iter().all(|d| calendar.is_workday(*d)));

        let mut cursor = start;
        for accepted in &dates {
            prop_assert!(*accepted >= cursor);
            prop_assert!(cursor
                .iter_days()
                .take_while(|d| d < accepted)
                .all(|d| !calendar.is_workday(d)));
            cursor = accepted.succ_opt().unwrap();
        }
    }

    #[test]
    fn backward_mirrors_forward(start in any_date(), n in 1usize..40) {
        let calendar = UsFederalCalendar::new();
        let forward = dates_forward_from(&calendar, start, n, false).unwrap();
        let last = *forward.last().unwrap();
        let backward = dates_backward_from(&calendar, last, n, false).unwrap();
        prop_assert_eq!(backward, forward);
    }

    #[test]
    fn computed_windows_are_ordered(
        anchor in any_date(),
        weight in 0i64..20_000,
        miles in 1u32..=3800,
    ) {
        let scheduler = MoveDateScheduler::new(UsFederalCalendar::new(), StandardEntitlements);
        let summary = scheduler
            .compute_move_dates_for_weight(Pound(weight), Miles(miles), anchor, anchor)
            .unwrap();
        let calendar = scheduler.calendar();

        prop_assert_eq!(summary.pickup_days.len(), 1);
        let pickup = summary.pickup_days[0];
        prop_assert!(pickup >= anchor && calendar.is_workday(pickup));
        prop_assert!(summary.pack_days.iter().all(|d| *d < anchor && calendar.is_workday(*d)));

        let transit_anchor = pickup.succ_opt().unwrap();
        let expected_transit: Vec<NaiveDate> = transit_anchor
            .iter_days()
            .take(summary.transit_days.len())
            .collect();
        prop_assert_eq!(&summary.transit_days, &expected_transit);

        prop_assert_eq!(summary.delivery_days.len(), 1);
        let delivery = summary.delivery_days[0];
        prop_assert!(summary.transit_days.iter().all(|d| *d < delivery));
        prop_assert!(calendar.is_workday(delivery));
    }
}
