//! Calendar day value type.
//!
//! # Responsibility
//! - Represent one calendar day inside the supported year window.
//! - Keep day-of-month valid when month or year changes underneath it.
//!
//! # Invariants
//! - `year` is within `[MIN_YEAR, MAX_YEAR]`.
//! - `month` is within `[1, 12]`.
//! - `day` is within `[1, days_in_month(month, year)]`.

use crate::calendar::{days_in_month, month_short_name, MAX_YEAR, MIN_YEAR};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failures for calendar day construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValidationError {
    /// Year falls outside the supported window.
    YearOutOfRange(i16),
    /// Month is not within `1..=12`.
    MonthOutOfRange(i8),
    /// Day does not exist in the given month of the given year.
    DayOutOfRange { year: i16, month: i8, day: i8 },
}

impl Display for DateValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::YearOutOfRange(year) => write!(
                f,
                "year {year} is outside supported range {MIN_YEAR}..={MAX_YEAR}"
            ),
            Self::MonthOutOfRange(month) => write!(f, "month {month} is outside 1..=12"),
            Self::DayOutOfRange { year, month, day } => {
                write!(f, "day {day} does not exist in {year}-{month:02}")
            }
        }
    }
}

impl Error for DateValidationError {}

/// One calendar day.
///
/// Field order matters: the derived `Ord` compares year, then month, then day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDate")]
pub struct Date {
    year: i16,
    month: i8,
    day: i8,
}

impl Date {
    /// Earliest representable day.
    pub const MIN: Date = Date {
        year: MIN_YEAR,
        month: 1,
        day: 1,
    };

    /// Creates a validated calendar day.
    ///
    /// # Errors
    /// - `YearOutOfRange` when `year` is outside `[MIN_YEAR, MAX_YEAR]`.
    /// - `MonthOutOfRange` when `month` is outside `1..=12`.
    /// - `DayOutOfRange` when `day` does not exist in that month.
    pub fn new(year: i16, month: i8, day: i8) -> Result<Self, DateValidationError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DateValidationError::YearOutOfRange(year));
        }
        if !(1..=12).contains(&month) {
            return Err(DateValidationError::MonthOutOfRange(month));
        }
        if day < 1 || day > days_in_month(month, year) {
            return Err(DateValidationError::DayOutOfRange { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    /// Builds the closest valid day by clamping each field into range.
    ///
    /// Used when the input comes from a source outside our control, such as
    /// the host clock.
    pub fn clamped(year: i32, month: u32, day: u32) -> Self {
        let year = year.clamp(i32::from(MIN_YEAR), i32::from(MAX_YEAR)) as i16;
        let month = month.clamp(1, 12) as i8;
        let max_day = days_in_month(month, year);
        let day = (day.clamp(1, max_day as u32)) as i8;
        Self { year, month, day }
    }

    pub fn year(&self) -> i16 {
        self.year
    }

    pub fn month(&self) -> i8 {
        self.month
    }

    pub fn day(&self) -> i8 {
        self.day
    }

    /// Returns a copy with `day` replaced.
    pub fn with_day(self, day: i8) -> Result<Self, DateValidationError> {
        Self::new(self.year, self.month, day)
    }

    /// Returns a copy moved to `month`, clamping the day to that month's length.
    ///
    /// 31 January moved to February becomes the last day of February.
    pub fn with_month(self, month: i8) -> Result<Self, DateValidationError> {
        if !(1..=12).contains(&month) {
            return Err(DateValidationError::MonthOutOfRange(month));
        }
        let day = self.day.min(days_in_month(month, self.year));
        Self::new(self.year, month, day)
    }

    /// Returns a copy moved to `year`, clamping the day (29 Feb in a non-leap
    /// year becomes 28 Feb).
    pub fn with_year(self, year: i16) -> Result<Self, DateValidationError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DateValidationError::YearOutOfRange(year));
        }
        let day = self.day.min(days_in_month(self.month, year));
        Self::new(year, self.month, day)
    }

    /// Panel label in `D.Mon.YYYY` form, e.g. `15.Mar.2024`.
    pub fn short_label(&self) -> String {
        format!(
            "{}.{}.{}",
            self.day,
            month_short_name(self.month),
            self.year
        )
    }
}

impl Default for Date {
    fn default() -> Self {
        Self::MIN
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Unvalidated wire shape; converted through `Date::new`.
#[derive(Deserialize)]
struct RawDate {
    year: i16,
    month: i8,
    day: i8,
}

impl TryFrom<RawDate> for Date {
    type Error = DateValidationError;

    fn try_from(raw: RawDate) -> Result<Self, Self::Error> {
        Date::new(raw.year, raw.month, raw.day)
    }
}
