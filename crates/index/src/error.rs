//! Error types for the spi-index crate.

/// Error type for all fallible operations in the spi-index crate.
///
/// Missing accumulations, degenerate partitions and empty partitions are
/// data conditions handled inside the pipeline; they never surface here.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SpiError {
    /// Returned when the observation series contains no rows.
    #[error("observation series is empty")]
    EmptyData,

    /// Returned when a month value is outside 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month value.
        month: u8,
    },

    /// Returned when a present precipitation value is negative or not finite.
    #[error("invalid precipitation {value} for {region} at {period} (must be finite and >= 0)")]
    InvalidValue {
        /// Display form of the region key.
        region: String,
        /// Display form of the year/month.
        period: String,
        /// The offending value.
        value: f64,
    },

    /// Returned when the same region and month appear more than once.
    #[error("duplicate observation for {region} at {period}")]
    DuplicateObservation {
        /// Display form of the region key.
        region: String,
        /// Display form of the year/month.
        period: String,
    },

    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a gamma distribution cannot be constructed.
    ///
    /// The `message` field is a `String` (not a statrs error type) because
    /// statrs errors do not implement `Clone`.
    #[error("gamma construction failed (shape={shape}, scale={scale}): {message}")]
    GammaConstruction {
        /// Shape parameter that caused the failure.
        shape: f64,
        /// Scale parameter that caused the failure.
        scale: f64,
        /// Description of the failure.
        message: String,
    },

    /// Returned when the standard normal distribution cannot be constructed.
    #[error("normal construction failed: {message}")]
    NormalConstruction {
        /// Description of the failure.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_empty_data() {
        assert_eq!(SpiError::EmptyData.to_string(), "observation series is empty");
    }

    #[test]
    fn error_invalid_month() {
        let e = SpiError::InvalidMonth { month: 13 };
        assert_eq!(e.to_string(), "invalid month: 13 (must be 1..=12)");
    }

    #[test]
    fn error_invalid_value() {
        let e = SpiError::InvalidValue {
            region: "North/Alpha/101".to_string(),
            period: "2001-03".to_string(),
            value: -2.5,
        };
        assert_eq!(
            e.to_string(),
            "invalid precipitation -2.5 for North/Alpha/101 at 2001-03 (must be finite and >= 0)"
        );
    }

    #[test]
    fn error_duplicate_observation() {
        let e = SpiError::DuplicateObservation {
            region: "North/Alpha/101".to_string(),
            period: "2001-03".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "duplicate observation for North/Alpha/101 at 2001-03"
        );
    }

    #[test]
    fn error_invalid_config() {
        let e = SpiError::InvalidConfig {
            reason: "time_scales must not be empty".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "invalid configuration: time_scales must not be empty"
        );
    }

    #[test]
    fn error_gamma_construction() {
        let e = SpiError::GammaConstruction {
            shape: -1.0,
            scale: 2.0,
            message: "shape must be positive".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "gamma construction failed (shape=-1, scale=2): shape must be positive"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<SpiError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<SpiError>();
    }
}
