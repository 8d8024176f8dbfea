// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! ISO-8601 week identity and the clock capability.
//!
//! A [`Week`] is a (week-number, year) pair under ISO-8601 rules: the year
//! is the year-for-week-of-year, which differs from the calendar year at
//! year boundaries. Every representable week maps bidirectionally to a
//! canonical changeover instant, the week's Monday. That Monday date is
//! what the persistence layer stores and filters on; the database never
//! derives week numbers itself.

use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime, Weekday};

use crate::error::DomainError;

/// An ISO-8601 calendar week identity.
///
/// Two weeks are equal iff both the week number and the week-based year
/// match. Ordering is chronological: by year, then by week number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Week {
    /// The ISO week number (1-53).
    pub week: u8,
    /// The ISO week-based year. May differ from the calendar year of
    /// individual days in the week.
    pub year: i32,
}

impl PartialOrd for Week {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Week {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.year, self.week).cmp(&(other.year, other.week))
    }
}

impl std::fmt::Display for Week {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

impl Week {
    /// Creates a week identity from raw components.
    ///
    /// The pair is not validated here; [`Week::start_date`] is the point
    /// where an impossible pair (week 53 of a 52-week year, absurd years)
    /// surfaces as an error.
    #[must_use]
    pub const fn new(week: u8, year: i32) -> Self {
        Self { week, year }
    }

    /// Normalizes a calendar date to its ISO week identity.
    #[must_use]
    pub fn from_date(date: Date) -> Self {
        let (year, week, _weekday) = date.to_iso_week_date();
        Self { week, year }
    }

    /// The current week according to the supplied clock.
    #[must_use]
    pub fn current(clock: &dyn Clock) -> Self {
        Self::from_date(clock.today())
    }

    /// Synthesizes the canonical changeover instant for this week: its
    /// Monday.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnrepresentableWeek`] if the pair does not
    /// resolve to a valid calendar date. Callers must treat this as a
    /// client error, never a crash.
    pub fn start_date(self) -> Result<Date, DomainError> {
        Date::from_iso_week_date(self.year, self.week, Weekday::Monday).map_err(|_| {
            DomainError::UnrepresentableWeek {
                week: self.week,
                year: self.year,
            }
        })
    }

    /// Shifts this week by whole calendar weeks and re-normalizes.
    ///
    /// The arithmetic goes through the underlying Monday date so that
    /// year boundaries follow ISO rules rather than naive week-number
    /// wrapping.
    ///
    /// # Errors
    ///
    /// Returns an error if this week is unrepresentable or if the shifted
    /// date falls outside the supported calendar range.
    pub fn offset(self, delta_weeks: i64) -> Result<Self, DomainError> {
        let start: Date = self.start_date()?;
        let shifted: Date = start
            .checked_add(Duration::weeks(delta_weeks))
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("offsetting {self} by {delta_weeks} weeks"),
            })?;
        Ok(Self::from_date(shifted))
    }
}

/// Source of "today" for current-week derivation.
///
/// Wall-clock access is injected rather than read globally so tests can
/// pin the current week instead of depending on real execution time.
pub trait Clock: Send + Sync {
    /// The current date in UTC.
    fn today(&self) -> Date;
}

/// Clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_utc().date()
    }
}
