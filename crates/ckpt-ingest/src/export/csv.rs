//! CSV export of the checkpoint table

use crate::error::{IngestError, Result};
use ckpt_common::{StoredCheckpoint, CHECKPOINT_COLUMNS};
use std::path::Path;

/// Write all rows with a header line, replacing any existing file
pub fn write(rows: &[StoredCheckpoint], path: &Path) -> Result<usize> {
    let mut writer = ::csv::Writer::from_path(path)?;
    writer.write_record(CHECKPOINT_COLUMNS)?;

    for row in rows {
        let id = row.id.to_string();
        writer.write_record(std::iter::once(id.as_str()).chain(row.record.values()))?;
    }

    writer.flush().map_err(|e| IngestError::io(path, e))?;
    Ok(rows.len())
}
