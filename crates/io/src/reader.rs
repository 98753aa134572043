//! CSV reader configuration and orchestration.

use std::io::Read;
use std::path::Path;

use spi_index::{Observation, ObservationSeries, RegionKey};
use tracing::{debug, info};

use crate::error::IoError;
use crate::validate::{ValidationCollector, parse_month, parse_precip, parse_year};

/// Default wide-layout month column names.
const MONTH_COLUMNS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Arrangement of the monthly values in an input table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// One row per region, year and month with `month` and `precip` columns.
    #[default]
    Long,
    /// One row per region and year with one column per calendar month.
    Wide,
}

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Configuration for reading monthly precipitation from CSV.
///
/// Use the builder methods (`with_*`) to customise column names, the
/// layout and the tokens treated as a missing value. Column names are
/// matched case-insensitively.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    layout: Layout,
    district_col: String,
    sub_district_col: String,
    code_col: String,
    year_col: String,
    /// Long layout only.
    month_col: String,
    /// Long layout only.
    precip_col: String,
    /// Wide layout only, January first.
    month_cols: Vec<String>,
    missing_tokens: Vec<String>,
    delimiter: u8,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Long,
            district_col: "district".into(),
            sub_district_col: "sub_district".into(),
            code_col: "sub_district_code".into(),
            year_col: "year".into(),
            month_col: "month".into(),
            precip_col: "precip".into(),
            month_cols: MONTH_COLUMNS.iter().map(|&m| m.to_string()).collect(),
            missing_tokens: vec![String::new(), "NA".into(), "NaN".into()],
            delimiter: b',',
        }
    }
}

impl ReaderConfig {
    /// Set the table layout.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the district column name.
    pub fn with_district_col(mut self, name: impl Into<String>) -> Self {
        self.district_col = name.into();
        self
    }

    /// Set the sub-district column name.
    pub fn with_sub_district_col(mut self, name: impl Into<String>) -> Self {
        self.sub_district_col = name.into();
        self
    }

    /// Set the sub-district code column name.
    pub fn with_code_col(mut self, name: impl Into<String>) -> Self {
        self.code_col = name.into();
        self
    }

    /// Set the year column name.
    pub fn with_year_col(mut self, name: impl Into<String>) -> Self {
        self.year_col = name.into();
        self
    }

    /// Set the month-number column name (long layout).
    pub fn with_month_col(mut self, name: impl Into<String>) -> Self {
        self.month_col = name.into();
        self
    }

    /// Set the precipitation column name (long layout).
    pub fn with_precip_col(mut self, name: impl Into<String>) -> Self {
        self.precip_col = name.into();
        self
    }

    /// Set the twelve month column names, January first (wide layout).
    pub fn with_month_cols<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.month_cols = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the cell values read as a missing observation.
    pub fn with_missing_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Table layout.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if a column name is empty or the wide
    /// layout does not name exactly twelve month columns.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut c = ValidationCollector::new();
        let named = [
            ("district", &self.district_col),
            ("sub_district", &self.sub_district_col),
            ("code", &self.code_col),
            ("year", &self.year_col),
            ("month", &self.month_col),
            ("precip", &self.precip_col),
        ];
        for (role, name) in named {
            if name.trim().is_empty() {
                c.push(format!("{role} column name must not be empty"));
            }
        }
        if self.month_cols.len() != 12 {
            c.push(format!(
                "expected 12 month columns, got {}",
                self.month_cols.len()
            ));
        }
        if self.month_cols.iter().any(|m| m.trim().is_empty()) {
            c.push("month column names must not be empty");
        }
        c.finish()
    }
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

enum ValueColumns {
    Long { month: usize, precip: usize },
    Wide { months: Vec<usize> },
}

struct Columns {
    district: usize,
    sub_district: usize,
    code: usize,
    year: usize,
    values: ValueColumns,
}

fn find_column(headers: &csv::StringRecord, name: &str, source: &str) -> Result<usize, IoError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| IoError::MissingColumn {
            name: name.to_string(),
            source_name: source.to_string(),
        })
}

fn resolve_columns(
    headers: &csv::StringRecord,
    config: &ReaderConfig,
    source: &str,
) -> Result<Columns, IoError> {
    let values = match config.layout {
        Layout::Long => ValueColumns::Long {
            month: find_column(headers, &config.month_col, source)?,
            precip: find_column(headers, &config.precip_col, source)?,
        },
        Layout::Wide => ValueColumns::Wide {
            months: config
                .month_cols
                .iter()
                .map(|m| find_column(headers, m, source))
                .collect::<Result<_, _>>()?,
        },
    };

    Ok(Columns {
        district: find_column(headers, &config.district_col, source)?,
        sub_district: find_column(headers, &config.sub_district_col, source)?,
        code: find_column(headers, &config.code_col, source)?,
        year: find_column(headers, &config.year_col, source)?,
        values,
    })
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn push_observation(
    rows: &mut Vec<Observation>,
    c: &mut ValidationCollector,
    region: RegionKey,
    year: i32,
    month: u8,
    value: Option<f64>,
    line: u64,
) {
    match Observation::new(region, year, month, value) {
        Ok(obs) => rows.push(obs),
        Err(e) => c.push(format!("line {line}: {e}")),
    }
}

fn read_records<R: Read>(
    mut reader: csv::Reader<R>,
    config: &ReaderConfig,
    source: &str,
) -> Result<ObservationSeries, IoError> {
    let headers = reader.headers()?.clone();
    let cols = resolve_columns(&headers, config, source)?;

    let mut collector = ValidationCollector::new();
    let mut rows = Vec::new();
    let mut n_records = 0usize;
    let mut record = csv::StringRecord::new();

    while reader.read_record(&mut record)? {
        n_records += 1;
        let line = record.position().map_or(0, |p| p.line());
        let field = |i: usize| record.get(i).unwrap_or("");

        let region = RegionKey::new(
            field(cols.district).trim(),
            field(cols.sub_district).trim(),
            field(cols.code).trim(),
        );
        let Some(year) = parse_year(field(cols.year), line, &mut collector) else {
            continue;
        };

        match &cols.values {
            ValueColumns::Long { month, precip } => {
                let month = parse_month(field(*month), line, &mut collector);
                let value = parse_precip(
                    field(*precip),
                    &config.missing_tokens,
                    line,
                    &config.precip_col,
                    &mut collector,
                );
                if let (Some(month), Some(value)) = (month, value) {
                    push_observation(&mut rows, &mut collector, region, year, month, value, line);
                }
            }
            ValueColumns::Wide { months } => {
                for (i, &idx) in months.iter().enumerate() {
                    let value = parse_precip(
                        field(idx),
                        &config.missing_tokens,
                        line,
                        &config.month_cols[i],
                        &mut collector,
                    );
                    if let Some(value) = value {
                        let month = (i + 1) as u8;
                        push_observation(
                            &mut rows,
                            &mut collector,
                            region.clone(),
                            year,
                            month,
                            value,
                            line,
                        );
                    }
                }
            }
        }
    }

    collector.finish()?;

    let n_missing = rows.iter().filter(|o| o.value().is_none()).count();
    debug!(n_records, n_observations = rows.len(), n_missing, "parsed records");

    let series = ObservationSeries::from_observations(rows)?;
    info!(
        source,
        layout = ?config.layout,
        n_regions = series.n_regions(),
        n_rows = series.len(),
        "read observations"
    );
    Ok(series)
}

fn csv_builder(config: &ReaderConfig) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.delimiter(config.delimiter).has_headers(true);
    builder
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Read monthly precipitation from a CSV file.
///
/// Wide tables are melted into one observation per month. Cells matching
/// a missing-value token become absent observations.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist,
/// [`IoError::MissingColumn`] if a configured column is absent,
/// [`IoError::Validation`] listing every malformed cell (unparseable
/// numbers, months outside 1..=12, negative or infinite precipitation),
/// and [`IoError::Index`] for duplicate (region, year, month) rows.
pub fn read_csv(path: &Path, config: &ReaderConfig) -> Result<ObservationSeries, IoError> {
    config.validate()?;

    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let reader = csv_builder(config).from_path(path)?;
    read_records(reader, config, &path.display().to_string())
}

/// Read monthly precipitation from any CSV byte source.
///
/// # Errors
///
/// Same as [`read_csv`], except [`IoError::FileNotFound`].
pub fn read_csv_from<R: Read>(
    source: R,
    config: &ReaderConfig,
) -> Result<ObservationSeries, IoError> {
    config.validate()?;
    let reader = csv_builder(config).from_reader(source);
    read_records(reader, config, "<reader>")
}
