//! Accounting periods (statement cycles) bounded by a cut-off day of the month.
//!
//! A period starts on the cut-off day of one month and ends the day before the
//! cut-off day of the following month. With the default cut-off day of 11, the
//! period containing 6 September 2024 runs from 11 August to 10 September.

use std::fmt::Display;

use time::{Date, Duration, Month};

use crate::{Error, html::format_date};

/// The default cut-off day used for the organization's accounting periods.
pub const DEFAULT_CUTOFF_DAY: u8 = 11;

/// A validated day of the month (1-31) on which a new accounting period starts.
///
/// Days 29, 30 and 31 are allowed. In months that are too short the cut-off
/// falls on the last day of the month instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutoffDay(u8);

impl CutoffDay {
    /// Create a cut-off day.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidCutoffDay] if `day` is not between 1 and 31.
    pub fn new(day: u8) -> Result<Self, Error> {
        if (1..=31).contains(&day) {
            Ok(Self(day))
        } else {
            Err(Error::InvalidCutoffDay(day))
        }
    }

    /// The day of the month.
    pub fn day(self) -> u8 {
        self.0
    }
}

impl Default for CutoffDay {
    fn default() -> Self {
        Self(DEFAULT_CUTOFF_DAY)
    }
}

/// An inclusive date range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountingPeriod {
    pub start: Date,
    pub end: Date,
}

impl Display for AccountingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", format_date(self.start), format_date(self.end))
    }
}

/// Compute the accounting period that contains `today`.
///
/// If `today` is on or after this month's cut-off, the period started this
/// month, otherwise it started on the cut-off of the previous month. The period
/// ends the day before the cut-off of the month after it started.
pub fn resolve_period(today: Date, cutoff_day: CutoffDay) -> AccountingPeriod {
    let this_months_cutoff = cutoff_date(today.year(), today.month(), cutoff_day);

    let start = if today >= this_months_cutoff {
        this_months_cutoff
    } else {
        let (year, month) = previous_month(today.year(), today.month());
        cutoff_date(year, month, cutoff_day)
    };

    let (next_year, next_month) = next_month(start.year(), start.month());
    let end = cutoff_date(next_year, next_month, cutoff_day) - Duration::days(1);

    AccountingPeriod { start, end }
}

fn cutoff_date(year: i32, month: Month, cutoff_day: CutoffDay) -> Date {
    let day = cutoff_day.day().min(month.length(year));

    Date::from_calendar_date(year, month, day)
        .expect("cut-off day is clamped to the length of the month")
}

fn previous_month(year: i32, month: Month) -> (i32, Month) {
    match month {
        Month::January => (year - 1, Month::December),
        month => (year, month.previous()),
    }
}

fn next_month(year: i32, month: Month) -> (i32, Month) {
    match month {
        Month::December => (year + 1, Month::January),
        month => (year, month.next()),
    }
}
