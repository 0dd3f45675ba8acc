// Copyright 2025 Cowboy AI, LLC.

//! Business-day calendars
//!
//! The scheduler only asks one question of a calendar: is this date a
//! workday. [`UsFederalCalendar`] answers it for weekends and the US federal
//! holidays, optionally shifting weekend holidays to the nearest weekday the
//! way federal offices observe them.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Answers whether a calendar day is a workday.
///
/// Implementations must be deterministic: the same date always gets the
/// same answer.
pub trait BusinessCalendar: Send + Sync {
    /// Whether `date` is neither a weekend day nor a recognized holiday
    fn is_workday(&self, date: NaiveDate) -> bool;
}

impl<C: BusinessCalendar + ?Sized> BusinessCalendar for &C {
    fn is_workday(&self, date: NaiveDate) -> bool {
        (**self).is_workday(date)
    }
}

/// Saturday or Sunday
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Holiday rules for [`UsFederalCalendar`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Move fixed-date holidays landing on Saturday to Friday and on Sunday
    /// to Monday
    pub observe_weekend_holidays: bool,
    /// Extra non-workdays, e.g. installation closures
    pub additional_holidays: Vec<NaiveDate>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            observe_weekend_holidays: true,
            additional_holidays: Vec::new(),
        }
    }
}

/// Weekends plus the ten US federal holidays
#[derive(Debug, Clone, Default)]
pub struct UsFederalCalendar {
    observe_weekend_holidays: bool,
    additional: BTreeSet<NaiveDate>,
}

impl UsFederalCalendar {
    /// Calendar with observed weekend holidays and no extra closures
    pub fn new() -> Self {
        Self::from_config(&CalendarConfig::default())
    }

    /// Calendar built from configuration
    pub fn from_config(config: &CalendarConfig) -> Self {
        Self {
            observe_weekend_holidays: config.observe_weekend_holidays,
            additional: config.additional_holidays.iter().copied().collect(),
        }
    }

    /// Whether `date` is a holiday (as observed, when observation is on)
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        if self.additional.contains(&date) {
            return true;
        }
        // An observed New Year's Day can land on Dec 31 of the prior year.
        [date.year(), date.year() + 1]
            .into_iter()
            .any(|year| self.holidays(year).contains(&date))
    }

    /// Holidays of `year`, as observed when observation is on
    pub fn holidays(&self, year: i32) -> Vec<NaiveDate> {
        let fixed = [(1, 1), (7, 4), (11, 11), (12, 25)]
            .into_iter()
            .filter_map(|(month, day)| NaiveDate::from_ymd_opt(year, month, day))
            .map(|date| {
                if self.observe_weekend_holidays {
                    observed(date)
                } else {
                    date
                }
            });

        let floating = [
            nth_weekday(year, 1, Weekday::Mon, 3),  // Martin Luther King Jr. Day
            nth_weekday(year, 2, Weekday::Mon, 3),  // Washington's Birthday
            last_weekday(year, 5, Weekday::Mon),    // Memorial Day
            nth_weekday(year, 9, Weekday::Mon, 1),  // Labor Day
            nth_weekday(year, 10, Weekday::Mon, 2), // Columbus Day
            nth_weekday(year, 11, Weekday::Thu, 4), // Thanksgiving Day
        ]
        .into_iter()
        .flatten();

        let mut holidays: Vec<NaiveDate> = fixed.chain(floating).collect();
        holidays.sort();
        holidays
    }
}

impl BusinessCalendar for UsFederalCalendar {
    fn is_workday(&self, date: NaiveDate) -> bool {
        !is_weekend(date) && !self.is_holiday(date)
    }
}

fn observed(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date.checked_sub_days(Days::new(1)).unwrap_or(date),
        Weekday::Sun => date.checked_add_days(Days::new(1)).unwrap_or(date),
        _ => date,
    }
}

fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    (1..=5)
        .rev()
        .find_map(|n| NaiveDate::from_weekday_of_month_opt(year, month, weekday, n))
}
