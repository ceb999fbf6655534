//! Run summary and console report

use ckpt_common::Category;
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of one successful pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Items processed and inserted
    pub count: usize,

    /// Items per category, in traversal order
    pub per_category: Vec<(Category, usize)>,

    pub table_path: PathBuf,
    pub table_bytes: u64,

    pub export_path: PathBuf,
    pub export_bytes: u64,
}

impl Summary {
    /// Items processed for one category
    pub fn category_count(&self, category: Category) -> usize {
        self.per_category
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// Console report: item total, table size in MB, export size in KB
    pub fn report_lines(&self) -> Vec<String> {
        vec![
            format!("Total files processed: {}", self.count),
            format!("Table file size: {} megabytes", format_megabytes(self.table_bytes)),
            format!("Parquet file size: {} kilobytes", format_kilobytes(self.export_bytes)),
        ]
    }
}

/// Bytes as megabytes (1024 * 1024) with two decimals
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / (1024.0 * 1024.0))
}

/// Bytes as kilobytes (1024) with two decimals
pub fn format_kilobytes(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / 1024.0)
}
