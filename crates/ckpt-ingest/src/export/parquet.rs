//! Parquet export of the checkpoint table

use crate::error::{IngestError, Result};
use arrow::array::{Array, ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use ckpt_common::{CheckpointRecord, StoredCheckpoint, CHECKPOINT_COLUMNS};
use ::parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use ::parquet::arrow::ArrowWriter;
use ::parquet::basic::{Compression, GzipLevel, ZstdLevel};
use ::parquet::file::properties::WriterProperties;
use ::parquet::file::reader::{FileReader, SerializedFileReader};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Compression codec for the exported file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParquetCompression {
    #[default]
    Snappy,
    Zstd,
    Gzip,
    None,
}

impl ParquetCompression {
    fn codec(self) -> Compression {
        match self {
            ParquetCompression::Snappy => Compression::SNAPPY,
            ParquetCompression::Zstd => Compression::ZSTD(ZstdLevel::default()),
            ParquetCompression::Gzip => Compression::GZIP(GzipLevel::default()),
            ParquetCompression::None => Compression::UNCOMPRESSED,
        }
    }
}

impl std::str::FromStr for ParquetCompression {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "snappy" => Ok(ParquetCompression::Snappy),
            "zstd" => Ok(ParquetCompression::Zstd),
            "gzip" => Ok(ParquetCompression::Gzip),
            "none" | "uncompressed" => Ok(ParquetCompression::None),
            _ => Err(format!(
                "Invalid compression '{}'. Expected one of: snappy, zstd, gzip, none",
                s
            )),
        }
    }
}

impl std::fmt::Display for ParquetCompression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParquetCompression::Snappy => write!(f, "snappy"),
            ParquetCompression::Zstd => write!(f, "zstd"),
            ParquetCompression::Gzip => write!(f, "gzip"),
            ParquetCompression::None => write!(f, "none"),
        }
    }
}

/// Arrow schema of the exported table: `id` as Int64, everything else Utf8
pub fn checkpoint_schema() -> SchemaRef {
    let fields = CHECKPOINT_COLUMNS
        .iter()
        .map(|&name| {
            let data_type = if name == "id" {
                DataType::Int64
            } else {
                DataType::Utf8
            };
            Field::new(name, data_type, false)
        })
        .collect::<Vec<_>>();

    Arc::new(Schema::new(fields))
}

/// Build a single record batch holding every row
pub fn to_record_batch(rows: &[StoredCheckpoint]) -> Result<RecordBatch> {
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(CHECKPOINT_COLUMNS.len());
    columns.push(Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.id))));

    for index in 0..CHECKPOINT_COLUMNS.len() - 1 {
        let values = rows.iter().map(|r| r.record.values()[index]);
        columns.push(Arc::new(StringArray::from_iter_values(values)));
    }

    Ok(RecordBatch::try_new(checkpoint_schema(), columns)?)
}

/// Write all rows to `path`, replacing any existing file.
///
/// Returns the number of rows written.
pub fn write(rows: &[StoredCheckpoint], path: &Path, compression: ParquetCompression) -> Result<usize> {
    let batch = to_record_batch(rows)?;
    let props = WriterProperties::builder()
        .set_compression(compression.codec())
        .build();

    let file = File::create(path).map_err(|e| IngestError::io(path, e))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(batch.num_rows())
}

/// Row count recorded in the file footer
pub fn row_count(path: &Path) -> Result<usize> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    let reader = SerializedFileReader::new(file)?;
    Ok(reader.metadata().file_metadata().num_rows() as usize)
}

/// Read an exported file back into rows, in file order
pub fn read(path: &Path) -> Result<Vec<StoredCheckpoint>> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        rows.extend(from_record_batch(&batch?)?);
    }
    Ok(rows)
}

fn from_record_batch(batch: &RecordBatch) -> Result<Vec<StoredCheckpoint>> {
    let ids = column::<Int64Array>(batch, "id")?;
    let strings = CHECKPOINT_COLUMNS[1..]
        .iter()
        .map(|&name| column::<StringArray>(batch, name))
        .collect::<Result<Vec<_>>>()?;
    let text = |col: usize, row: usize| strings[col].value(row).to_string();

    let rows = (0..batch.num_rows())
        .map(|row| StoredCheckpoint {
            id: ids.value(row),
            record: CheckpointRecord {
                model_type: text(0, row),
                model_family: text(1, row),
                model_name: text(2, row),
                ckpt_file: text(3, row),
                url: text(4, row),
                autoencoder: text(5, row),
                clip_encoder: text(6, row),
                image_encoder: text(7, row),
                t5_encoder: text(8, row),
                full_json: text(9, row),
            },
        })
        .collect();

    Ok(rows)
}

fn column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .and_then(|array| array.as_any().downcast_ref::<T>())
        .ok_or_else(|| {
            IngestError::Arrow(ArrowError::SchemaError(format!(
                "column '{}' is missing or has an unexpected type",
                name
            )))
        })
}
