//! Error types for spi-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the spi-io crate.
///
/// This enum covers missing files, malformed CSV input, Parquet failures,
/// and errors raised by the index crate while assembling or writing a
/// series.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the csv crate.
    #[error("csv error: {reason}")]
    Csv {
        /// Description of the underlying CSV failure.
        reason: String,
    },

    /// Wraps an error originating from the Parquet or Arrow libraries.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying Parquet failure.
        reason: String,
    },

    /// Wraps an error originating from the spi-index crate.
    #[error("index error: {reason}")]
    Index {
        /// Description of the underlying index failure.
        reason: String,
    },

    /// Returned when a required column is absent from the header row.
    #[error("column '{name}' not found in {source_name}")]
    MissingColumn {
        /// Configured column name.
        name: String,
        /// File path or other description of the input.
        source_name: String,
    },

    /// Returned when one or more rows fail to parse.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Returned when a year/month has no calendar date.
    #[error("no calendar date for {year:04}-{month:02}")]
    InvalidDate {
        /// Year.
        year: i32,
        /// Month.
        month: u8,
    },
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::Csv {
            reason: e.to_string(),
        }
    }
}

impl From<parquet::errors::ParquetError> for IoError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<arrow::error::ArrowError> for IoError {
    fn from(e: arrow::error::ArrowError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<spi_index::SpiError> for IoError {
    fn from(e: spi_index::SpiError) -> Self {
        IoError::Index {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/missing.csv"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.csv");
    }

    #[test]
    fn display_csv() {
        let err = IoError::Csv {
            reason: "unequal lengths".to_string(),
        };
        assert_eq!(err.to_string(), "csv error: unequal lengths");
    }

    #[test]
    fn display_parquet() {
        let err = IoError::Parquet {
            reason: "corrupt footer".to_string(),
        };
        assert_eq!(err.to_string(), "parquet error: corrupt footer");
    }

    #[test]
    fn display_index() {
        let err = IoError::Index {
            reason: "no observations".to_string(),
        };
        assert_eq!(err.to_string(), "index error: no observations");
    }

    #[test]
    fn display_missing_column() {
        let err = IoError::MissingColumn {
            name: "precip".to_string(),
            source_name: "/data/rain.csv".to_string(),
        };
        assert_eq!(err.to_string(), "column 'precip' not found in /data/rain.csv");
    }

    #[test]
    fn display_validation() {
        let err = IoError::Validation {
            count: 2,
            details: "line 3: invalid year 'x'; line 7: invalid month '13'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "2 validation error(s): line 3: invalid year 'x'; line 7: invalid month '13'"
        );
    }

    #[test]
    fn display_invalid_date() {
        let err = IoError::InvalidDate {
            year: 2001,
            month: 13,
        };
        assert_eq!(err.to_string(), "no calendar date for 2001-13");
    }

    #[test]
    fn from_parquet_error() {
        let pq_err = parquet::errors::ParquetError::General("test pq error".to_string());
        let err: IoError = pq_err.into();
        assert!(matches!(err, IoError::Parquet { .. }));
        assert!(err.to_string().contains("test pq error"));
    }

    #[test]
    fn from_index_error() {
        let err: IoError = spi_index::SpiError::EmptyData.into();
        assert!(matches!(err, IoError::Index { .. }));
        assert!(err.to_string().starts_with("index error"));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<IoError>();
    }
}
