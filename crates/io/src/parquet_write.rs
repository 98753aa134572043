//! Low-level Parquet column building.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, Date32Array, Float64Array, Int32Array, RecordBatch, StringArray, UInt8Array,
    UInt32Array,
};
use arrow::datatypes::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use spi_index::SpiScore;

use crate::error::IoError;
use crate::record::{SCORE_COLUMNS, ScoreRecord, days_since_epoch};

/// Builds the Arrow schema for score output.
///
/// Column order and names match the CSV writer.
pub(crate) fn build_schema() -> Schema {
    let types = [
        DataType::Utf8,
        DataType::Utf8,
        DataType::Utf8,
        DataType::Date32,
        DataType::Int32,
        DataType::UInt8,
        DataType::UInt32,
        DataType::Float64,
        DataType::Utf8,
    ];
    let fields: Vec<Field> = SCORE_COLUMNS
        .iter()
        .zip(types)
        .map(|(name, ty)| Field::new(*name, ty, false))
        .collect();
    Schema::new(fields)
}

/// Converts a slice of scores into an Arrow [`RecordBatch`].
pub(crate) fn scores_to_record_batch(
    scores: &[SpiScore],
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let records = scores
        .iter()
        .map(ScoreRecord::from_score)
        .collect::<Result<Vec<_>, _>>()?;

    let scale = records
        .iter()
        .map(|r| {
            u32::try_from(r.scale).map_err(|_| IoError::Parquet {
                reason: format!("scale {} does not fit in u32", r.scale),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.district))),
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.sub_district))),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.sub_district_code),
        )),
        Arc::new(Date32Array::from_iter_values(
            records.iter().map(|r| days_since_epoch(r.date)),
        )),
        Arc::new(Int32Array::from_iter_values(records.iter().map(|r| r.year))),
        Arc::new(UInt8Array::from_iter_values(records.iter().map(|r| r.month))),
        Arc::new(UInt32Array::from(scale)),
        Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.spi))),
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.category))),
    ];

    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Writes a sequence of [`RecordBatch`]es to a Parquet file at `path`.
///
/// # Errors
///
/// Returns [`IoError::Parquet`] if file creation, batch writing, or file
/// finalisation fails.
pub(crate) fn write_batches(
    path: &Path,
    batches: &[RecordBatch],
    schema: &Schema,
    props: WriterProperties,
) -> Result<(), IoError> {
    let file = std::fs::File::create(path).map_err(|e| IoError::Parquet {
        reason: format!("{}: {e}", path.display()),
    })?;
    let mut writer = ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props))?;

    for batch in batches {
        writer.write(batch)?;
    }

    writer.close()?;
    Ok(())
}
