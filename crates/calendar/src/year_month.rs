//! Calendar month with year context.

use std::fmt;

use crate::error::CalendarError;

/// A calendar month (1..=12) within a specific year.
///
/// Ordering is chronological. Two values are adjacent months exactly when
/// their [`ordinal`](YearMonth::ordinal)s differ by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u8,
}

impl YearMonth {
    /// Creates a new `YearMonth`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] if `month` is outside 1..=12.
    pub fn new(year: i32, month: u8) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }
        Ok(Self { year, month })
    }

    /// Returns the year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// Returns the month (1..=12).
    pub fn month(self) -> u8 {
        self.month
    }

    /// Months elapsed since January of year 0.
    pub fn ordinal(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month - 1)
    }

    /// Returns the following month, wrapping December into January of the
    /// next year. `None` after December of `i32::MAX`.
    pub fn next(self) -> Option<Self> {
        if self.month == 12 {
            let year = self.year.checked_add(1)?;
            Some(Self { year, month: 1 })
        } else {
            Some(Self {
                year: self.year,
                month: self.month + 1,
            })
        }
    }

    /// Returns `true` if `self` is the month immediately after `prev`.
    pub fn is_successor_of(self, prev: Self) -> bool {
        self.ordinal() - prev.ordinal() == 1
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
