//! Shared fixtures for ckpt-ingest integration tests
//!
//! A [`Fixture`] owns two temporary directories: a source tree laid out as
//! `<root>/<category>/<item>/metadata.json` and an output directory for the
//! table file and exported artifacts.

#![allow(dead_code)]

use ckpt_common::Category;
use ckpt_ingest::IngestConfig;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Fixture {
    root: TempDir,
    out: TempDir,
}

impl Fixture {
    /// Empty source tree with every category folder present
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("Failed to create source dir");
        let out = tempfile::tempdir().expect("Failed to create output dir");
        for category in Category::ALL {
            fs::create_dir_all(root.path().join(category.as_str()))
                .expect("Failed to create category dir");
        }
        Self { root, out }
    }

    /// One valid item in every category
    pub fn with_one_item_per_category() -> Self {
        let fixture = Self::new();
        for category in Category::ALL {
            fixture.add_item(category, "item", &sample_metadata(category.as_str()));
        }
        fixture
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn out(&self) -> &Path {
        self.out.path()
    }

    pub fn table_path(&self) -> PathBuf {
        self.out().join("ckpt.db")
    }

    pub fn export_path(&self) -> PathBuf {
        self.out().join("ckpt.parquet")
    }

    /// Write `metadata.json` for one item
    pub fn add_item(&self, category: Category, item: &str, metadata: &Value) {
        self.add_raw_item(category, item, &metadata.to_string());
    }

    /// Write arbitrary text as an item's metadata file
    pub fn add_raw_item(&self, category: Category, item: &str, contents: &str) {
        let dir = self.add_empty_item(category, item);
        fs::write(dir.join("metadata.json"), contents).expect("Failed to write metadata");
    }

    /// Create an item directory without a metadata file
    pub fn add_empty_item(&self, category: Category, item: &str) -> PathBuf {
        let dir = self.root().join(category.as_str()).join(item);
        fs::create_dir_all(&dir).expect("Failed to create item dir");
        dir
    }

    /// Drop a regular file directly into a category folder
    pub fn add_stray_file(&self, category: Category, name: &str) {
        fs::write(self.root().join(category.as_str()).join(name), b"not an item")
            .expect("Failed to write stray file");
    }

    /// Configuration pointing at this fixture's directories
    pub fn config(&self) -> IngestConfig {
        IngestConfig::builder()
            .root(self.root())
            .table_path(self.table_path())
            .export_path(self.export_path())
            .build()
            .expect("Fixture config should be valid")
    }

    /// Rows in the table file, read straight through SQLite
    pub fn table_row_count(&self) -> i64 {
        let conn = rusqlite::Connection::open(self.table_path()).expect("Failed to open table");
        conn.query_row("SELECT COUNT(*) FROM ckpt", [], |row| row.get(0))
            .expect("Failed to count rows")
    }
}

/// A complete metadata record whose name mentions the item
pub fn sample_metadata(item: &str) -> Value {
    json!({
        "name": format!("{item} checkpoint"),
        "version": "sdxl_base_v0.9",
        "file": format!("{item}_f16.ckpt"),
        "autoencoder": "sdxl_vae_v1.0_f16.ckpt",
        "clip_encoder": "clip_vit_l14_f16.ckpt",
        "download": { "file": format!("https://example.com/{item}.safetensors") },
        "prefix": "",
        "upcast_attention": false
    })
}
