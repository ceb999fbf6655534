//! Exporters for the populated checkpoint table
//!
//! - `parquet`: the compressed columnar artifact consumers depend on
//! - `csv`: optional flat-text copy of the same rows
//! - `sql`: optional replayable dump (schema plus one `INSERT` per row)

pub mod csv;
pub mod parquet;
pub mod sql;

pub use self::parquet::ParquetCompression;
