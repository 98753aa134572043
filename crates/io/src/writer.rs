//! Score and fit table writers.

use std::collections::BTreeMap;
use std::path::Path;

use parquet::file::properties::WriterProperties;
use spi_index::{FittedDistribution, PartitionKey, SpiScore};
use tracing::info;

use crate::error::IoError;
use crate::parquet_write;
use crate::record::{FIT_COLUMNS, FitRecord, SCORE_COLUMNS, ScoreRecord};

/// Compression algorithm for Parquet output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    None,
    /// Snappy compression (fast, moderate ratio).
    #[default]
    Snappy,
    /// Zstd compression (slower, better ratio).
    Zstd,
}

impl Compression {
    /// Converts to the corresponding `parquet::basic::Compression` variant.
    fn to_parquet(self) -> Result<parquet::basic::Compression, IoError> {
        Ok(match self {
            Self::None => parquet::basic::Compression::UNCOMPRESSED,
            Self::Snappy => parquet::basic::Compression::SNAPPY,
            Self::Zstd => {
                let level =
                    parquet::basic::ZstdLevel::try_new(3).map_err(|e| IoError::Parquet {
                        reason: e.to_string(),
                    })?;
                parquet::basic::Compression::ZSTD(level)
            }
        })
    }
}

/// File format of the score table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated text with a header row.
    #[default]
    Csv,
    /// Apache Parquet.
    Parquet,
}

impl OutputFormat {
    /// Guesses the format from a file extension (`.csv`, `.parquet`, `.pq`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }
}

/// Configuration for writing score tables.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Output file format.
    format: OutputFormat,
    /// Compression algorithm to use (Parquet only).
    compression: Compression,
    /// Maximum number of rows per row group (Parquet only).
    row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            compression: Compression::default(),
            row_group_size: 1_000_000,
        }
    }
}

impl WriterConfig {
    /// Sets the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Sets the maximum number of rows per row group.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if `row_group_size` is zero.
    fn validate(&self) -> Result<(), IoError> {
        if self.row_group_size == 0 {
            return Err(IoError::Validation {
                count: 1,
                details: "row_group_size must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Write scores in the configured format.
///
/// # Errors
///
/// See [`write_scores_csv`] and [`write_scores_parquet`].
pub fn write_scores(
    path: &Path,
    scores: &[SpiScore],
    config: &WriterConfig,
) -> Result<(), IoError> {
    match config.format {
        OutputFormat::Csv => write_scores_csv(path, scores),
        OutputFormat::Parquet => write_scores_parquet(path, scores, config),
    }
}

/// Write scores to a CSV file, one row per score.
///
/// # Errors
///
/// Returns [`IoError::Csv`] if the file cannot be created or written.
pub fn write_scores_csv(path: &Path, scores: &[SpiScore]) -> Result<(), IoError> {
    let mut writer = csv::Writer::from_path(path)?;
    if scores.is_empty() {
        writer.write_record(SCORE_COLUMNS)?;
    }
    for score in scores {
        writer.serialize(ScoreRecord::from_score(score)?)?;
    }
    writer.flush().map_err(|e| IoError::Csv {
        reason: e.to_string(),
    })?;
    info!(path = %path.display(), n_rows = scores.len(), "wrote scores (csv)");
    Ok(())
}

/// Write scores to a Parquet file.
///
/// Rows are split into batches of at most `row_group_size` rows.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if the configuration is invalid, or
/// [`IoError::Parquet`] if schema construction, batch conversion, or file
/// I/O fails.
pub fn write_scores_parquet(
    path: &Path,
    scores: &[SpiScore],
    config: &WriterConfig,
) -> Result<(), IoError> {
    config.validate()?;

    let schema = parquet_write::build_schema();

    let compression = config.compression.to_parquet()?;
    let props = WriterProperties::builder()
        .set_compression(compression)
        .set_max_row_group_size(config.row_group_size)
        .build();

    let batches = scores
        .chunks(config.row_group_size)
        .map(|chunk| parquet_write::scores_to_record_batch(chunk, &schema))
        .collect::<Result<Vec<_>, _>>()?;

    parquet_write::write_batches(path, &batches, &schema, props)?;

    info!(
        path = %path.display(),
        n_rows = scores.len(),
        compression = ?config.compression,
        "wrote scores (parquet)"
    );
    Ok(())
}

/// Write fitted distributions to a CSV file, one row per partition.
///
/// # Errors
///
/// Returns [`IoError::Csv`] if the file cannot be created or written.
pub fn write_fits_csv(
    path: &Path,
    fits: &BTreeMap<PartitionKey, FittedDistribution>,
) -> Result<(), IoError> {
    let mut writer = csv::Writer::from_path(path)?;
    if fits.is_empty() {
        writer.write_record(FIT_COLUMNS)?;
    }
    for (key, fit) in fits {
        writer.serialize(FitRecord::new(key, fit))?;
    }
    writer.flush().map_err(|e| IoError::Csv {
        reason: e.to_string(),
    })?;
    info!(path = %path.display(), n_rows = fits.len(), "wrote fits (csv)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = WriterConfig::default();
        assert_eq!(config.format, OutputFormat::Csv);
        assert_eq!(config.compression, Compression::Snappy);
        assert_eq!(config.row_group_size, 1_000_000);
    }

    #[test]
    fn builder_methods() {
        let config = WriterConfig::default()
            .with_format(OutputFormat::Parquet)
            .with_compression(Compression::Zstd)
            .with_row_group_size(500);
        assert_eq!(config.format(), OutputFormat::Parquet);
        assert_eq!(config.compression, Compression::Zstd);
        assert_eq!(config.row_group_size, 500);
    }

    #[test]
    fn validate_ok() {
        let config = WriterConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_zero_row_group_size() {
        let config = WriterConfig::default().with_row_group_size(0);
        let err = config.validate().unwrap_err();
        match err {
            IoError::Validation { count, details } => {
                assert_eq!(count, 1);
                assert!(details.contains("row_group_size"));
            }
            _ => panic!("expected Validation error"),
        }
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out/spi.csv")),
            Some(OutputFormat::Csv)
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("spi.PARQUET")),
            Some(OutputFormat::Parquet)
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("spi.pq")),
            Some(OutputFormat::Parquet)
        );
        assert_eq!(OutputFormat::from_path(Path::new("spi.txt")), None);
        assert_eq!(OutputFormat::from_path(Path::new("spi")), None);
    }

    #[test]
    fn compression_maps_to_parquet() {
        assert_eq!(
            Compression::None.to_parquet().unwrap(),
            parquet::basic::Compression::UNCOMPRESSED
        );
        assert_eq!(
            Compression::Snappy.to_parquet().unwrap(),
            parquet::basic::Compression::SNAPPY
        );
        assert!(matches!(
            Compression::Zstd.to_parquet().unwrap(),
            parquet::basic::Compression::ZSTD(_)
        ));
    }
}
