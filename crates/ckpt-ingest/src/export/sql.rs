//! Replayable SQL dump of the checkpoint table
//!
//! The dump recreates the table and inserts every row with its original id.
//! Values are embedded as quoted literals, so this is the one place where
//! quote escaping applies.

use crate::error::{IngestError, Result};
use crate::store::{SCHEMA_SQL, TABLE_NAME};
use ckpt_common::literal::quote_literal;
use ckpt_common::{StoredCheckpoint, CHECKPOINT_COLUMNS};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Render the dump as SQL text
pub fn render(rows: &[StoredCheckpoint]) -> String {
    let columns = CHECKPOINT_COLUMNS.join(", ");
    let mut out = String::new();

    out.push_str("BEGIN;\n");
    out.push_str(&format!("DROP TABLE IF EXISTS {};\n", TABLE_NAME));
    out.push_str(SCHEMA_SQL.trim());
    out.push('\n');

    for row in rows {
        let values = row
            .record
            .values()
            .iter()
            .map(|value| quote_literal(value))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "INSERT INTO {} ({}) VALUES ({}, {});\n",
            TABLE_NAME, columns, row.id, values
        ));
    }

    out.push_str("COMMIT;\n");
    out
}

/// Write the dump to `path`, replacing any existing file
pub fn write(rows: &[StoredCheckpoint], path: &Path) -> Result<usize> {
    let file = std::fs::File::create(path).map_err(|e| IngestError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(render(rows).as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| IngestError::io(path, e))?;
    Ok(rows.len())
}
