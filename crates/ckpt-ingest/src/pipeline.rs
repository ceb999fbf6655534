// Checkpoint ingest-and-export pipeline
//
// Runs one ingestion end to end:
// 1. Init: remove stale artifacts, reset the table store
// 2. Discover item directories per category
// 3. Read and decode each metadata file
// 4. Normalize and insert inside one load transaction
// 5. Export the table to Parquet (plus optional CSV / SQL dump)
// 6. Report file sizes and write the optional run manifest
//
// Any error aborts the run. The load transaction is never committed on
// failure, so the table is left empty and no Parquet file exists.

use std::path::Path;
use std::time::Instant;

use ckpt_common::Category;
use tracing::{debug, info, info_span, warn};

use crate::config::IngestConfig;
use crate::discover::{discover_all, ItemSource};
use crate::error::{IngestError, Result};
use crate::export::{csv, parquet, sql};
use crate::manifest::RunManifest;
use crate::metadata::MetadataDocument;
use crate::normalize::normalize;
use crate::progress::create_item_progress;
use crate::report::Summary;
use crate::store::CheckpointStore;

pub struct IngestPipeline {
    config: IngestConfig,
}

impl IngestPipeline {
    /// Create a new pipeline
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Run the whole pipeline once
    pub fn run(&self) -> Result<Summary> {
        self.config.validate()?;

        let span = info_span!("ingest", root = %self.config.root.display());
        let _enter = span.enter();
        let start_time = Instant::now();

        // Step 1: Init
        info!("Step 1/6: Initializing {}", self.config.table_path.display());
        for artifact in self.config.export_artifacts() {
            remove_stale(artifact)?;
        }
        let mut store = CheckpointStore::create(&self.config.table_path)?;

        // Step 2: Discover
        let sources = discover_all(&self.config.root, &self.config.categories)?;
        info!(
            "Step 2/6: Discovered {} item directories under {}",
            sources.len(),
            self.config.root.display()
        );

        // Steps 3-4: Read, normalize, insert
        info!("Steps 3-4/6: Loading checkpoint metadata");
        let per_category = self.load(&mut store, &sources)?;
        let count = per_category.iter().map(|(_, n)| n).sum();

        // Step 5: Export
        let rows = store.checkpoints()?;
        info!(
            "Step 5/6: Exporting {} rows to {}",
            rows.len(),
            self.config.export_path.display()
        );
        self.export(&rows)?;
        store.close()?;

        // Step 6: Report
        let summary = Summary {
            count,
            per_category,
            table_path: self.config.table_path.clone(),
            table_bytes: file_size(&self.config.table_path)?,
            export_path: self.config.export_path.clone(),
            export_bytes: file_size(&self.config.export_path)?,
        };

        if let Some(manifest_path) = &self.config.manifest_path {
            ensure_parent(manifest_path)?;
            RunManifest::from_summary(&summary)?.write(manifest_path)?;
            debug!(path = %manifest_path.display(), "Wrote run manifest");
        }

        info!(
            "Step 6/6: Ingestion complete: {} checkpoints in {:.2}s",
            summary.count,
            start_time.elapsed().as_secs_f64()
        );

        Ok(summary)
    }

    /// Insert every discovered item inside one transaction.
    ///
    /// Returns the per-category counts in configured category order.
    fn load(
        &self,
        store: &mut CheckpointStore,
        sources: &[ItemSource],
    ) -> Result<Vec<(Category, usize)>> {
        let mut per_category: Vec<(Category, usize)> =
            self.config.categories.iter().map(|&c| (c, 0)).collect();

        let pb = create_item_progress(
            sources.len() as u64,
            "Loading checkpoints",
            self.config.show_progress,
        );
        let mut loader = store.loader()?;

        for source in sources {
            let path = source.metadata_path(&self.config.metadata_file);
            let document = MetadataDocument::read(&path)?;
            let record = normalize(source.category, &document)
                .map_err(|e| IngestError::validation(&path, e))?;

            let id = loader.insert(&record)?;
            debug!(
                id,
                category = %source.category,
                name = %record.model_name,
                path = %path.display(),
                "Inserted checkpoint"
            );

            if let Some(entry) = per_category.iter_mut().find(|(c, _)| *c == source.category) {
                entry.1 += 1;
            }
            pb.inc(1);
        }

        let inserted = loader.commit()?;
        pb.finish_and_clear();
        info!("Loaded {} checkpoints", inserted);

        Ok(per_category)
    }

    fn export(&self, rows: &[ckpt_common::StoredCheckpoint]) -> Result<()> {
        let export_path = &self.config.export_path;
        ensure_parent(export_path)?;

        let written = parquet::write(rows, export_path, self.config.compression)?;
        let actual = parquet::row_count(export_path)?;
        if actual != written {
            return Err(IngestError::ExportMismatch {
                path: export_path.clone(),
                expected: written,
                actual,
            });
        }
        debug!(rows = written, compression = %self.config.compression, "Wrote parquet export");

        if let Some(csv_path) = &self.config.csv_path {
            ensure_parent(csv_path)?;
            let n = csv::write(rows, csv_path)?;
            info!("Wrote {} rows to {}", n, csv_path.display());
        }

        if let Some(sql_path) = &self.config.sql_dump_path {
            ensure_parent(sql_path)?;
            let n = sql::write(rows, sql_path)?;
            info!("Wrote SQL dump of {} rows to {}", n, sql_path.display());
        }

        Ok(())
    }
}

fn remove_stale(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            warn!(path = %path.display(), "Removed artifact from a previous run");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(IngestError::io(path, e)),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => std::fs::create_dir_all(parent).map_err(|e| IngestError::io(parent, e)),
        None => Ok(()),
    }
}

fn file_size(path: &Path) -> Result<u64> {
    std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| IngestError::io(path, e))
}
