//! # spi-io
//!
//! Read regional monthly precipitation tables from CSV (long or wide
//! layout) and write SPI scores to CSV or Parquet and fitted distributions
//! to CSV. Bridges external file formats into the `spi-index` types.

mod error;
mod parquet_write;
mod reader;
mod record;
mod validate;
mod writer;

pub use error::IoError;
pub use reader::{Layout, ReaderConfig, read_csv, read_csv_from};
pub use writer::{
    Compression, OutputFormat, WriterConfig, write_fits_csv, write_scores, write_scores_csv,
    write_scores_parquet,
};
