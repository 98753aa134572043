//! Pure conversion functions: TOML config structs -> crate API config types.

use std::path::Path;

use anyhow::{Result, bail};

use crate::config::{IndexToml, IoToml};

use spi_index::{ProbabilityBounds, SpiConfig};
use spi_io::{Compression, Layout, OutputFormat, ReaderConfig, WriterConfig};

/// Parses a compression algorithm name string into the corresponding enum variant.
pub fn parse_compression(s: &str) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "snappy" => Ok(Compression::Snappy),
        "zstd" => Ok(Compression::Zstd),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Parses an input layout name.
pub fn parse_layout(s: &str) -> Result<Layout> {
    match s.to_lowercase().as_str() {
        "long" => Ok(Layout::Long),
        "wide" => Ok(Layout::Wide),
        other => bail!("unknown layout: {other:?} (expected \"long\" or \"wide\")"),
    }
}

/// Parses an output format name.
pub fn parse_format(s: &str) -> Result<OutputFormat> {
    match s.to_lowercase().as_str() {
        "csv" => Ok(OutputFormat::Csv),
        "parquet" => Ok(OutputFormat::Parquet),
        other => bail!("unknown output format: {other:?}"),
    }
}

/// Picks the output format: the explicit setting if present, else the
/// output file extension, else CSV.
pub fn resolve_format(io: &IoToml, output: &Path) -> Result<OutputFormat> {
    match &io.format {
        Some(s) => parse_format(s),
        None => Ok(OutputFormat::from_path(output).unwrap_or_default()),
    }
}

/// Builds a [`ReaderConfig`] from the TOML I/O configuration.
pub fn build_reader_config(io: &IoToml) -> Result<ReaderConfig> {
    let cols = &io.columns;
    let mut cfg = ReaderConfig::default().with_layout(parse_layout(&io.layout)?);
    if let Some(ref name) = cols.district {
        cfg = cfg.with_district_col(name);
    }
    if let Some(ref name) = cols.sub_district {
        cfg = cfg.with_sub_district_col(name);
    }
    if let Some(ref name) = cols.sub_district_code {
        cfg = cfg.with_code_col(name);
    }
    if let Some(ref name) = cols.year {
        cfg = cfg.with_year_col(name);
    }
    if let Some(ref name) = cols.month {
        cfg = cfg.with_month_col(name);
    }
    if let Some(ref name) = cols.precip {
        cfg = cfg.with_precip_col(name);
    }
    if let Some(ref months) = cols.months {
        cfg = cfg.with_month_cols(months.iter().cloned());
    }
    if let Some(ref tokens) = io.missing_values {
        cfg = cfg.with_missing_tokens(tokens.iter().cloned());
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`WriterConfig`] from the TOML I/O configuration.
pub fn build_writer_config(io: &IoToml, output: &Path) -> Result<WriterConfig> {
    let compression = parse_compression(&io.compression)?;
    Ok(WriterConfig::default()
        .with_format(resolve_format(io, output)?)
        .with_compression(compression)
        .with_row_group_size(io.row_group_size))
}

/// Builds an [`SpiConfig`] from the TOML index configuration.
///
/// `scales` (from the command line) replaces the configured scales.
pub fn build_spi_config(index: &IndexToml, scales: Option<&[usize]>) -> Result<SpiConfig> {
    let [lower, upper] = index.probability_bounds;
    let scales = scales.unwrap_or(&index.scales);
    let cfg = SpiConfig::new()
        .with_time_scales(scales.iter().copied())
        .with_probability_bounds(ProbabilityBounds::new(lower, upper))
        .with_parallel(index.parallel)
        .with_max_iterations(index.max_iterations)
        .with_tolerance(index.tolerance);
    cfg.validate()?;
    Ok(cfg)
}
