//! Compute command: read precipitation, compute SPI, write scores.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span};

use spi_index::{ObservationSeries, SpiResult, compute_spi};
use spi_io::{read_csv, write_scores};

use crate::cli::ComputeArgs;
use crate::config::SpiToml;
use crate::convert;

/// JSON run summary written by `--summary`.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub scales: Vec<usize>,
    pub n_regions: usize,
    pub n_observations: usize,
    pub n_scores: usize,
    pub n_fitted: usize,
    pub n_degenerate: usize,
    pub n_empty: usize,
    pub n_unfittable: usize,
    pub n_absent: usize,
    /// Scores in one of the dry categories.
    pub n_drought: usize,
    /// Score count per drought category label.
    pub categories: BTreeMap<&'static str, usize>,
}

impl RunSummary {
    fn new(
        input: &Path,
        output: &Path,
        scales: &[usize],
        series: &ObservationSeries,
        result: &SpiResult,
    ) -> Self {
        let stats = result.stats();
        let mut categories = BTreeMap::new();
        let mut n_drought = 0;
        for score in result.scores() {
            let category = score.category();
            *categories.entry(category.label()).or_insert(0) += 1;
            if category.is_drought() {
                n_drought += 1;
            }
        }
        Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            scales: scales.to_vec(),
            n_regions: series.n_regions(),
            n_observations: series.len(),
            n_scores: result.scores().len(),
            n_fitted: stats.n_fitted,
            n_degenerate: stats.n_degenerate,
            n_empty: stats.n_empty,
            n_unfittable: stats.n_unfittable,
            n_absent: stats.n_absent,
            n_drought,
            categories,
        }
    }
}

/// Resolves the input path (command line first) and reads the series.
pub fn read_series(config: &SpiToml, input: Option<PathBuf>) -> Result<(PathBuf, ObservationSeries)> {
    let input = input.or_else(|| config.io.input.clone()).ok_or_else(|| {
        anyhow::anyhow!("no input path: set [io].input in config or use --input")
    })?;
    let reader_cfg = convert::build_reader_config(&config.io)?;

    info!(path = %input.display(), layout = ?reader_cfg.layout(), "reading precipitation");
    let series = read_csv(&input, &reader_cfg)
        .with_context(|| format!("failed to read CSV: {}", input.display()))?;
    info!(
        n_regions = series.n_regions(),
        n_rows = series.len(),
        "precipitation loaded"
    );
    Ok((input, series))
}

/// Run the compute pipeline.
pub fn run(args: ComputeArgs) -> Result<()> {
    let _cmd = info_span!("compute").entered();

    // 1. Load config and resolve paths
    let config = SpiToml::load(args.config.as_deref())?;
    let output = args
        .output
        .or_else(|| config.io.output.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("no output path: set [io].output in config or use --output")
        })?;

    // 2. Build configs from TOML
    let spi_cfg = convert::build_spi_config(&config.index, args.scales.as_deref())?;
    let writer_cfg = convert::build_writer_config(&config.io, &output)?;

    // 3. Read observations
    let (input, series) = read_series(&config, args.input)?;

    // 4. Compute
    let result = compute_spi(&series, &spi_cfg).context("SPI computation failed")?;

    // 5. Write scores
    write_scores(&output, result.scores(), &writer_cfg)
        .with_context(|| format!("failed to write scores: {}", output.display()))?;
    info!(
        path = %output.display(),
        format = ?writer_cfg.format(),
        n_scores = result.scores().len(),
        "scores written"
    );

    // 6. Optional summary
    if let Some(path) = args.summary {
        let summary = RunSummary::new(&input, &output, spi_cfg.time_scales(), &series, &result);
        let json =
            serde_json::to_string_pretty(&summary).context("failed to serialise run summary")?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write summary: {}", path.display()))?;
        info!(path = %path.display(), "summary written");
    }

    Ok(())
}
