use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Standardized Precipitation Index for regional monthly records.
#[derive(Parser)]
#[command(
    name = "spi",
    version,
    about = "Standardized Precipitation Index for regional monthly precipitation"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Compute SPI values and write the score table.
    Compute(ComputeArgs),
    /// Fit the reference distributions and write the parameter table.
    Fit(FitArgs),
}

/// Arguments for the `compute` subcommand.
#[derive(clap::Args)]
pub struct ComputeArgs {
    /// Path to TOML configuration file (built-in defaults when omitted).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override input CSV path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override output path from config (.csv or .parquet).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override time scales from config, e.g. `3,6,12`.
    #[arg(short, long, value_delimiter = ',')]
    pub scales: Option<Vec<usize>>,

    /// Write a JSON run summary to this path.
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

/// Arguments for the `fit` subcommand.
#[derive(clap::Args)]
pub struct FitArgs {
    /// Path to TOML configuration file (built-in defaults when omitted).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override input CSV path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Path for the fitted-parameter CSV.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Override time scales from config, e.g. `3,6,12`.
    #[arg(short, long, value_delimiter = ',')]
    pub scales: Option<Vec<usize>>,
}
