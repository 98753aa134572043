//! Contiguous month sequence generation.

use crate::year_month::YearMonth;

/// Generates `n_months` consecutive months starting at `start`.
///
/// The sequence ends early if it would run past December of `i32::MAX`.
///
/// # Example
///
/// ```
/// use spi_calendar::{YearMonth, month_sequence};
///
/// let start = YearMonth::new(2000, 11).unwrap();
/// let months = month_sequence(start, 3);
/// // Nov 2000, Dec 2000, Jan 2001
/// assert_eq!(months[2], YearMonth::new(2001, 1).unwrap());
/// ```
pub fn month_sequence(start: YearMonth, n_months: usize) -> Vec<YearMonth> {
    std::iter::successors(Some(start), |m| m.next())
        .take(n_months)
        .collect()
}
