use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level SPI configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SpiToml {
    /// I/O settings.
    #[serde(default)]
    pub io: IoToml,

    /// Index settings.
    #[serde(default)]
    pub index: IndexToml,
}

impl SpiToml {
    /// Reads and parses a TOML file, or returns the defaults when `path` is
    /// `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    #[serde(default = "default_layout")]
    pub layout: String,
    /// Inferred from the output extension when absent.
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
    #[serde(default)]
    pub missing_values: Option<Vec<String>>,
    #[serde(default)]
    pub columns: ColumnsToml,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            layout: default_layout(),
            format: None,
            compression: default_compression(),
            row_group_size: default_row_group_size(),
            missing_values: None,
            columns: ColumnsToml::default(),
        }
    }
}

fn default_layout() -> String {
    "long".to_string()
}
fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    1_000_000
}

/// Input column name overrides. Unset names keep the reader defaults.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ColumnsToml {
    pub district: Option<String>,
    pub sub_district: Option<String>,
    pub sub_district_code: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
    pub precip: Option<String>,
    /// Wide layout month columns, January first.
    pub months: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexToml {
    #[serde(default = "default_scales")]
    pub scales: Vec<usize>,
    #[serde(default = "default_probability_bounds")]
    pub probability_bounds: [f64; 2],
    #[serde(default = "default_true")]
    pub parallel: bool,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for IndexToml {
    fn default() -> Self {
        Self {
            scales: default_scales(),
            probability_bounds: default_probability_bounds(),
            parallel: true,
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

fn default_scales() -> Vec<usize> {
    vec![3, 6, 12]
}
fn default_probability_bounds() -> [f64; 2] {
    [0.0001, 0.9999]
}
fn default_true() -> bool {
    true
}
fn default_max_iterations() -> usize {
    100
}
fn default_tolerance() -> f64 {
    1e-10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg: SpiToml = toml::from_str("").unwrap();
        assert_eq!(cfg.io.layout, "long");
        assert_eq!(cfg.io.compression, "snappy");
        assert!(cfg.io.format.is_none());
        assert_eq!(cfg.index.scales, vec![3, 6, 12]);
        assert_eq!(cfg.index.probability_bounds, [0.0001, 0.9999]);
        assert!(cfg.index.parallel);
    }

    #[test]
    fn full_file() {
        let cfg: SpiToml = toml::from_str(
            r#"
            [io]
            input = "precip.csv"
            output = "spi.parquet"
            layout = "wide"
            format = "parquet"
            compression = "zstd"
            missing_values = ["", "-999"]

            [io.columns]
            district = "province"
            months = ["j", "f", "m", "a", "my", "jn", "jl", "au", "s", "o", "n", "d"]

            [index]
            scales = [1, 24]
            probability_bounds = [0.001, 0.999]
            parallel = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.io.input, Some(PathBuf::from("precip.csv")));
        assert_eq!(cfg.io.layout, "wide");
        assert_eq!(cfg.io.format.as_deref(), Some("parquet"));
        assert_eq!(cfg.io.columns.district.as_deref(), Some("province"));
        assert_eq!(cfg.io.columns.months.as_ref().map(Vec::len), Some(12));
        assert_eq!(cfg.index.scales, vec![1, 24]);
        assert!(!cfg.index.parallel);
        assert_eq!(cfg.index.max_iterations, 100);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = toml::from_str::<SpiToml>("[index]\nscale = [3]\n").unwrap_err();
        assert!(err.to_string().contains("scale"));
    }

    #[test]
    fn load_without_path_is_default() {
        let cfg = SpiToml::load(None).unwrap();
        assert_eq!(cfg.index.scales, vec![3, 6, 12]);
    }

    #[test]
    fn load_missing_file_fails() {
        let err = SpiToml::load(Some(Path::new("/tmp/spi_no_such_config.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config file"));
    }
}
