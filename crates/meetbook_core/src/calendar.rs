//! Calendar arithmetic and the clock seam.
//!
//! # Responsibility
//! - Month lengths, leap years and month labels for the supported window.
//! - Resolve "today" through an injectable clock.
//!
//! # Invariants
//! - Month lengths follow the legacy odd/even rule: February is 28/29, every
//!   other odd month has 31 days and every other even month has 30. Files
//!   and UI state written by earlier builds rely on this rule.

use crate::model::date::Date;
use chrono::Datelike;

/// First year the calendar can address.
pub const MIN_YEAR: i16 = 2000;
/// Last year the calendar can address.
pub const MAX_YEAR: i16 = 2038;

const MONTH_SHORT_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Gregorian leap-year test.
pub fn is_leap_year(year: i16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `month` of `year`.
///
/// # Panics
/// - When `month` is outside `1..=12`. Callers validate months first
///   (see `Date::new`).
pub fn days_in_month(month: i8, year: i16) -> i8 {
    assert!(
        (1..=12).contains(&month),
        "days_in_month: month {month} outside 1..=12"
    );
    if month == 2 {
        if is_leap_year(year) {
            29
        } else {
            28
        }
    } else if month % 2 == 1 {
        31
    } else {
        30
    }
}

/// Three-letter month abbreviation, or `"Err"` for an invalid month.
pub fn month_short_name(month: i8) -> &'static str {
    if (1..=12).contains(&month) {
        MONTH_SHORT_NAMES[(month - 1) as usize]
    } else {
        "Err"
    }
}

/// Source of the current local date.
pub trait Clock {
    fn today(&self) -> Date;
}

/// Host wall clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    /// Years outside the supported window are clamped into it.
    fn today(&self) -> Date {
        let now = chrono::Local::now().date_naive();
        Date::clamped(now.year(), now.month(), now.day())
    }
}

/// Clock pinned to one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

/// Resolves today's date from `clock`.
pub fn today(clock: &impl Clock) -> Date {
    clock.today()
}

#[cfg(test)]
mod tests {
    use super::{
        days_in_month, is_leap_year, month_short_name, today, Clock, FixedClock, SystemClock,
        MAX_YEAR, MIN_YEAR,
    };
    use crate::model::date::Date;

    #[test]
    fn february_follows_gregorian_leap_rule() {
        assert_eq!(days_in_month(2, 2000), 29);
        assert_eq!(days_in_month(2, 2024), 29);
        assert_eq!(days_in_month(2, 2023), 28);
        assert_eq!(days_in_month(2, 1900), 28);
        assert!(!is_leap_year(2100));
    }

    #[test]
    fn other_months_alternate_on_parity() {
        assert_eq!(days_in_month(1, 2024), 31);
        assert_eq!(days_in_month(4, 2024), 30);
        assert_eq!(days_in_month(7, 2024), 31);
        assert_eq!(days_in_month(8, 2024), 30);
        assert_eq!(days_in_month(9, 2024), 31);
        assert_eq!(days_in_month(12, 2024), 30);
    }

    #[test]
    #[should_panic(expected = "outside 1..=12")]
    fn days_in_month_asserts_month_range() {
        days_in_month(0, 2024);
    }

    #[test]
    fn month_short_name_has_sentinel_for_invalid_input() {
        assert_eq!(month_short_name(1), "Jan");
        assert_eq!(month_short_name(12), "Dec");
        assert_eq!(month_short_name(0), "Err");
        assert_eq!(month_short_name(13), "Err");
    }

    #[test]
    fn fixed_clock_returns_pinned_date() {
        let pinned = Date::new(2024, 3, 15).unwrap();
        assert_eq!(today(&FixedClock(pinned)), pinned);
    }

    #[test]
    fn system_clock_stays_inside_supported_window() {
        let now = SystemClock.today();
        assert!((MIN_YEAR..=MAX_YEAR).contains(&now.year()));
    }
}
