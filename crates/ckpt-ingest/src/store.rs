//! Embedded table store for checkpoint rows
//!
//! A single SQLite file holding the `ckpt` table. The table is dropped and
//! recreated every time a store is created, so ids restart at 1 on each run.

use crate::error::{IngestError, Result};
use ckpt_common::{CheckpointRecord, StoredCheckpoint};
use rusqlite::{params, Connection, Row, Transaction};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the checkpoint table
pub const TABLE_NAME: &str = "ckpt";

/// DDL for the checkpoint table.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE ckpt (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    model_type TEXT NOT NULL CHECK (model_type <> ''),
    model_family TEXT NOT NULL CHECK (model_family <> ''),
    model_name TEXT NOT NULL CHECK (model_name <> ''),
    ckpt_file TEXT NOT NULL CHECK (ckpt_file <> ''),
    url TEXT NOT NULL DEFAULT '',
    autoencoder TEXT NOT NULL DEFAULT '',
    clip_encoder TEXT NOT NULL DEFAULT '',
    image_encoder TEXT NOT NULL DEFAULT '',
    t5_encoder TEXT NOT NULL DEFAULT '',
    full_json TEXT NOT NULL CHECK (json_valid(full_json))
);
"#;

const INSERT_SQL: &str = r#"
INSERT INTO ckpt (
    model_type, model_family, model_name, ckpt_file, url,
    autoencoder, clip_encoder, image_encoder, t5_encoder, full_json
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
"#;

const SELECT_SQL: &str = r#"
SELECT id, model_type, model_family, model_name, ckpt_file, url,
       autoencoder, clip_encoder, image_encoder, t5_encoder, full_json
FROM ckpt
ORDER BY id ASC
"#;

/// Drop any previous table and identity sequence, then recreate the schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("DROP TABLE IF EXISTS ckpt;")?;
    conn.execute_batch(SCHEMA_SQL)?;
    // AUTOINCREMENT tables keep their counter in sqlite_sequence
    conn.execute("DELETE FROM sqlite_sequence WHERE name = ?1", params![TABLE_NAME])?;
    Ok(())
}

/// Exclusively owned connection to the checkpoint table file
pub struct CheckpointStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl CheckpointStore {
    /// Open (or create) the table file and reset the checkpoint table
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| IngestError::io(parent, e))?;
        }

        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        debug!(path = %path.display(), "Initialized checkpoint table");

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Create a store backed by an in-memory database
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn, path: None })
    }

    /// Location of the table file, if file-backed
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Start loading rows inside a single transaction
    pub fn loader(&mut self) -> Result<Loader<'_>> {
        Ok(Loader {
            tx: self.conn.transaction()?,
            inserted: 0,
        })
    }

    /// Number of rows in the table
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM ckpt", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// All rows, ordered by id
    pub fn checkpoints(&self) -> Result<Vec<StoredCheckpoint>> {
        let mut stmt = self.conn.prepare(SELECT_SQL)?;
        let rows = stmt
            .query_map([], row_to_checkpoint)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Close the connection, flushing the table file
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        Ok(())
    }
}

/// Transaction-scoped inserter. Dropping it without [`Loader::commit`] rolls
/// every insert back.
pub struct Loader<'a> {
    tx: Transaction<'a>,
    inserted: usize,
}

impl Loader<'_> {
    /// Insert one record and return its assigned id
    pub fn insert(&mut self, record: &CheckpointRecord) -> Result<i64> {
        let mut stmt = self.tx.prepare_cached(INSERT_SQL)?;
        stmt.execute(params![
            record.model_type,
            record.model_family,
            record.model_name,
            record.ckpt_file,
            record.url,
            record.autoencoder,
            record.clip_encoder,
            record.image_encoder,
            record.t5_encoder,
            record.full_json,
        ])?;
        self.inserted += 1;
        Ok(self.tx.last_insert_rowid())
    }

    /// Rows inserted so far in this transaction
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    /// Commit all inserted rows
    pub fn commit(self) -> Result<usize> {
        self.tx.commit()?;
        Ok(self.inserted)
    }
}

fn row_to_checkpoint(row: &Row) -> rusqlite::Result<StoredCheckpoint> {
    Ok(StoredCheckpoint {
        id: row.get(0)?,
        record: CheckpointRecord {
            model_type: row.get(1)?,
            model_family: row.get(2)?,
            model_name: row.get(3)?,
            ckpt_file: row.get(4)?,
            url: row.get(5)?,
            autoencoder: row.get(6)?,
            clip_encoder: row.get(7)?,
            image_encoder: row.get(8)?,
            t5_encoder: row.get(9)?,
            full_json: row.get(10)?,
        },
    })
}
