//! Fit command: write the fitted reference distributions.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use spi_index::fit_distributions;
use spi_io::write_fits_csv;

use crate::cli::FitArgs;
use crate::compute_cmd::read_series;
use crate::config::SpiToml;
use crate::convert;

/// Fit every partition and write the parameter table.
pub fn run(args: FitArgs) -> Result<()> {
    let _cmd = info_span!("fit").entered();

    let config = SpiToml::load(args.config.as_deref())?;
    let spi_cfg = convert::build_spi_config(&config.index, args.scales.as_deref())?;

    let (_, series) = read_series(&config, args.input)?;

    let fits = fit_distributions(&series, &spi_cfg).context("distribution fitting failed")?;
    let n_degenerate = fits.values().filter(|f| f.is_degenerate()).count();

    write_fits_csv(&args.output, &fits)
        .with_context(|| format!("failed to write fits: {}", args.output.display()))?;
    info!(
        path = %args.output.display(),
        n_partitions = fits.len(),
        n_degenerate,
        "fits written"
    );

    Ok(())
}
