//! Accumulated validation of CSV cells.
//!
//! Provides [`ValidationCollector`] for gathering every malformed cell of a
//! file into a single [`IoError::Validation`], plus parsers for the year,
//! month and precipitation cells.

use crate::error::IoError;

/// Messages kept in the error details; the count covers all of them.
const MAX_DETAILS: usize = 10;

// ---------------------------------------------------------------------------
// ValidationCollector
// ---------------------------------------------------------------------------

/// Accumulates validation errors and converts them into a single
/// [`IoError::Validation`].
///
/// Create a collector, push zero or more error messages, then call
/// [`finish`](Self::finish) to obtain `Ok(())` when everything is valid or a
/// single `Err` that summarises the violations.
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    /// Create an empty collector.
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one validation error.
    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Returns `true` when no errors have been recorded.
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of recorded errors.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    /// Consume the collector and return `Ok(())` if no errors were recorded,
    /// or `Err(IoError::Validation { count, details })` otherwise.
    ///
    /// The `details` string joins the first messages with `"; "`.
    pub(crate) fn finish(self) -> Result<(), IoError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let count = self.errors.len();
        let mut details = self.errors[..count.min(MAX_DETAILS)].join("; ");
        if count > MAX_DETAILS {
            details.push_str(&format!("; (+{} more)", count - MAX_DETAILS));
        }
        Err(IoError::Validation { count, details })
    }
}

// ---------------------------------------------------------------------------
// Cell parsers
// ---------------------------------------------------------------------------

/// Returns `true` if `cell` is one of the configured missing-value tokens
/// (compared case-insensitively after trimming).
pub(crate) fn is_missing(cell: &str, tokens: &[String]) -> bool {
    let cell = cell.trim();
    tokens.iter().any(|t| t.eq_ignore_ascii_case(cell))
}

/// Parses a year cell, recording a message on failure.
pub(crate) fn parse_year(cell: &str, line: u64, c: &mut ValidationCollector) -> Option<i32> {
    match cell.trim().parse::<i32>() {
        Ok(y) => Some(y),
        Err(_) => {
            c.push(format!("line {line}: invalid year '{cell}'"));
            None
        }
    }
}

/// Parses a month-number cell, recording a message on failure.
///
/// Range checking is left to the index crate.
pub(crate) fn parse_month(cell: &str, line: u64, c: &mut ValidationCollector) -> Option<u8> {
    match cell.trim().parse::<u8>() {
        Ok(m) => Some(m),
        Err(_) => {
            c.push(format!("line {line}: invalid month '{cell}'"));
            None
        }
    }
}

/// Parses a precipitation cell.
///
/// Returns `Some(None)` for a missing-value token, `Some(Some(v))` for a
/// number and `None` (with a recorded message) for anything else.
pub(crate) fn parse_precip(
    cell: &str,
    missing: &[String],
    line: u64,
    column: &str,
    c: &mut ValidationCollector,
) -> Option<Option<f64>> {
    if is_missing(cell, missing) {
        return Some(None);
    }
    match cell.trim().parse::<f64>() {
        Ok(v) => Some(Some(v)),
        Err(_) => {
            c.push(format!("line {line}: invalid {column} '{cell}'"));
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Vec<String> {
        vec![String::new(), "NA".into(), "NaN".into()]
    }

    // -- ValidationCollector -------------------------------------------------

    #[test]
    fn collector_empty_is_ok() {
        let c = ValidationCollector::new();
        assert!(c.is_empty());
        assert_eq!(c.len(), 0);
        assert!(c.finish().is_ok());
    }

    #[test]
    fn collector_non_empty_is_err_with_correct_count() {
        let mut c = ValidationCollector::new();
        c.push("error one");
        c.push("error two");
        assert!(!c.is_empty());
        assert_eq!(c.len(), 2);

        let err = c.finish().unwrap_err();
        match err {
            IoError::Validation { count, details } => {
                assert_eq!(count, 2);
                assert_eq!(details, "error one; error two");
            }
            other => panic!("expected IoError::Validation, got {other:?}"),
        }
    }

    #[test]
    fn collector_truncates_details() {
        let mut c = ValidationCollector::new();
        for i in 0..25 {
            c.push(format!("e{i}"));
        }
        match c.finish().unwrap_err() {
            IoError::Validation { count, details } => {
                assert_eq!(count, 25);
                assert!(details.contains("e9"));
                assert!(!details.contains("e10"));
                assert!(details.ends_with("(+15 more)"));
            }
            other => panic!("expected IoError::Validation, got {other:?}"),
        }
    }

    // -- parsers -------------------------------------------------------------

    #[test]
    fn missing_tokens_case_insensitive() {
        let t = tokens();
        assert!(is_missing("", &t));
        assert!(is_missing("  ", &t));
        assert!(is_missing("na", &t));
        assert!(is_missing("NAN", &t));
        assert!(!is_missing("0", &t));
    }

    #[test]
    fn year_and_month() {
        let mut c = ValidationCollector::new();
        assert_eq!(parse_year(" 1999 ", 2, &mut c), Some(1999));
        assert_eq!(parse_month("7", 2, &mut c), Some(7));
        assert!(c.is_empty());

        assert_eq!(parse_year("19x9", 3, &mut c), None);
        assert_eq!(parse_month("-1", 4, &mut c), None);
        assert_eq!(c.len(), 2);
        let err = c.finish().unwrap_err().to_string();
        assert!(err.contains("line 3: invalid year '19x9'"));
        assert!(err.contains("line 4: invalid month '-1'"));
    }

    #[test]
    fn precip_cells() {
        let t = tokens();
        let mut c = ValidationCollector::new();
        assert_eq!(parse_precip("12.5", &t, 2, "precip", &mut c), Some(Some(12.5)));
        assert_eq!(parse_precip("0", &t, 2, "precip", &mut c), Some(Some(0.0)));
        assert_eq!(parse_precip("NaN", &t, 2, "precip", &mut c), Some(None));
        assert_eq!(parse_precip("", &t, 2, "precip", &mut c), Some(None));
        assert!(c.is_empty());

        assert_eq!(parse_precip("wet", &t, 5, "jan", &mut c), None);
        let err = c.finish().unwrap_err().to_string();
        assert!(err.contains("line 5: invalid jan 'wet'"));
    }
}
