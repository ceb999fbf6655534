//! End-to-end tests for the ingest-and-export pipeline
//!
//! Each test builds a temporary source tree, runs the pipeline against it and
//! inspects the table file and the exported artifacts.

mod common;

use ckpt_common::{Category, CheckpointRecord, StoredCheckpoint};
use ckpt_ingest::export::parquet;
use ckpt_ingest::manifest::RunManifest;
use ckpt_ingest::{IngestError, IngestPipeline, ValidationError};
use common::{sample_metadata, Fixture};
use serde_json::json;
use std::collections::BTreeSet;

// ============================================================================
// Happy path
// ============================================================================

#[test]
fn test_one_item_per_category() {
    let fixture = Fixture::with_one_item_per_category();

    let summary = IngestPipeline::new(fixture.config()).run().unwrap();
    assert_eq!(summary.count, 4);
    for category in Category::ALL {
        assert_eq!(summary.category_count(category), 1);
    }

    let rows = parquet::read(&fixture.export_path()).unwrap();
    assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    assert_eq!(
        rows.iter().map(|r| r.record.model_type.as_str()).collect::<Vec<_>>(),
        vec!["model", "lora", "controlnet", "uncurated_model"]
    );
    assert_eq!(fixture.table_row_count(), 4);
}

#[test]
fn test_download_url_only_for_loras_and_controlnets() {
    let fixture = Fixture::with_one_item_per_category();
    IngestPipeline::new(fixture.config()).run().unwrap();

    for row in parquet::read(&fixture.export_path()).unwrap() {
        let has_url = !row.record.url.is_empty();
        let expects_url = matches!(row.record.model_type.as_str(), "lora" | "controlnet");
        assert_eq!(has_url, expects_url, "unexpected url for {}", row.record.model_type);
    }
}

#[test]
fn test_full_json_keeps_the_whole_record() {
    let fixture = Fixture::new();
    let metadata = sample_metadata("quoted");
    fixture.add_item(Category::Models, "quoted", &metadata);
    IngestPipeline::new(fixture.config()).run().unwrap();

    let rows = parquet::read(&fixture.export_path()).unwrap();
    let full: serde_json::Value = serde_json::from_str(&rows[0].record.full_json).unwrap();
    assert_eq!(full, metadata);
}

#[test]
fn test_values_with_quotes_are_stored_verbatim() {
    let fixture = Fixture::new();
    fixture.add_item(
        Category::Loras,
        "bob",
        &json!({
            "name": "Bob's \"Fancy\" LoRA",
            "version": "sd_v1.5",
            "file": "bob's_lora_f16.ckpt",
            "download": { "file": "https://example.com/it's.safetensors" }
        }),
    );

    IngestPipeline::new(fixture.config()).run().unwrap();

    let rows = parquet::read(&fixture.export_path()).unwrap();
    assert_eq!(rows[0].record.model_name, "Bob's \"Fancy\" LoRA");
    assert_eq!(rows[0].record.ckpt_file, "bob's_lora_f16.ckpt");
    assert_eq!(rows[0].record.url, "https://example.com/it's.safetensors");
}

#[test]
fn test_empty_tree_exports_zero_rows() {
    let fixture = Fixture::new();

    let summary = IngestPipeline::new(fixture.config()).run().unwrap();
    assert_eq!(summary.count, 0);
    assert_eq!(parquet::row_count(&fixture.export_path()).unwrap(), 0);
    assert_eq!(
        summary.report_lines()[0],
        "Total files processed: 0".to_string()
    );
}

#[test]
fn test_repeated_runs_export_the_same_rows() {
    let fixture = Fixture::new();
    for item in ["alpha", "beta", "gamma"] {
        fixture.add_item(Category::Models, item, &sample_metadata(item));
        fixture.add_item(Category::Controlnets, item, &sample_metadata(item));
    }

    let as_set = |rows: Vec<StoredCheckpoint>| -> BTreeSet<CheckpointRecord> {
        rows.into_iter().map(|r| r.record).collect()
    };

    IngestPipeline::new(fixture.config()).run().unwrap();
    let first = parquet::read(&fixture.export_path()).unwrap();

    IngestPipeline::new(fixture.config()).run().unwrap();
    let second = parquet::read(&fixture.export_path()).unwrap();

    assert_eq!(first.len(), 6);
    assert_eq!(second.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(as_set(first), as_set(second));
    assert_eq!(fixture.table_row_count(), 6);
}

#[test]
fn test_category_subset() {
    let fixture = Fixture::with_one_item_per_category();
    let mut config = fixture.config();
    config.categories = vec![Category::Controlnets, Category::Models];

    let summary = IngestPipeline::new(config).run().unwrap();
    assert_eq!(summary.count, 2);

    let types: Vec<_> = parquet::read(&fixture.export_path())
        .unwrap()
        .into_iter()
        .map(|r| r.record.model_type)
        .collect();
    assert_eq!(types, vec!["controlnet", "model"]);
}

// ============================================================================
// Tolerated and fatal input problems
// ============================================================================

#[test]
fn test_stray_files_are_skipped() {
    let fixture = Fixture::with_one_item_per_category();
    fixture.add_stray_file(Category::Models, ".DS_Store");
    fixture.add_stray_file(Category::Loras, "README.md");

    let summary = IngestPipeline::new(fixture.config()).run().unwrap();
    assert_eq!(summary.count, 4);
}

#[test]
fn test_malformed_metadata_aborts_the_run() {
    let fixture = Fixture::with_one_item_per_category();
    fixture.add_raw_item(Category::Controlnets, "broken", "{\"name\": \"A\",");

    let err = IngestPipeline::new(fixture.config()).run().unwrap_err();
    match err {
        IngestError::Decode { path, .. } => {
            assert!(path.ends_with("controlnets/broken/metadata.json"))
        }
        other => panic!("expected decode error, got {other:?}"),
    }

    assert!(!fixture.export_path().exists());
    assert_eq!(fixture.table_row_count(), 0);
}

#[test]
fn test_malformed_metadata_removes_previous_export() {
    let fixture = Fixture::with_one_item_per_category();
    IngestPipeline::new(fixture.config()).run().unwrap();
    assert!(fixture.export_path().exists());

    fixture.add_raw_item(Category::Loras, "broken", "not json at all");
    assert!(IngestPipeline::new(fixture.config()).run().is_err());

    assert!(!fixture.export_path().exists());
    assert_eq!(fixture.table_row_count(), 0);
}

#[test]
fn test_non_object_metadata_is_malformed() {
    let fixture = Fixture::new();
    fixture.add_raw_item(Category::Models, "list", "[1, 2, 3]");

    let result = IngestPipeline::new(fixture.config()).run();
    assert!(matches!(result, Err(IngestError::Decode { .. })));
}

#[test]
fn test_missing_metadata_file_aborts_the_run() {
    let fixture = Fixture::with_one_item_per_category();
    fixture.add_empty_item(Category::UncuratedModels, "no-metadata");

    let err = IngestPipeline::new(fixture.config()).run().unwrap_err();
    match err {
        IngestError::Io { path, source } => {
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            assert!(path.ends_with("uncurated_models/no-metadata/metadata.json"));
        }
        other => panic!("expected io error, got {other:?}"),
    }
    assert_eq!(fixture.table_row_count(), 0);
}

#[test]
fn test_missing_required_field_aborts_the_run() {
    let fixture = Fixture::new();
    fixture.add_item(Category::Loras, "nameless", &json!({"version": "v1", "file": "a.ckpt"}));

    let err = IngestPipeline::new(fixture.config()).run().unwrap_err();
    assert!(matches!(
        err,
        IngestError::Validation {
            source: ValidationError::MissingField("name"),
            ..
        }
    ));
    assert!(!fixture.export_path().exists());
}

#[test]
fn test_missing_category_folder_aborts_the_run() {
    let fixture = Fixture::new();
    std::fs::remove_dir(fixture.root().join("controlnets")).unwrap();

    let result = IngestPipeline::new(fixture.config()).run();
    assert!(matches!(result, Err(IngestError::Io { .. })));
}

// ============================================================================
// Optional artifacts
// ============================================================================

#[test]
fn test_csv_and_sql_dump_artifacts() {
    let fixture = Fixture::with_one_item_per_category();
    let csv_path = fixture.out().join("exports").join("ckpt.csv");
    let sql_path = fixture.out().join("exports").join("ckpt.sql");

    let mut config = fixture.config();
    config.csv_path = Some(csv_path.clone());
    config.sql_dump_path = Some(sql_path.clone());
    IngestPipeline::new(config).run().unwrap();

    let csv_text = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv_text.lines();
    assert!(lines.next().unwrap().starts_with("id,model_type,model_family"));
    assert_eq!(lines.count(), 4);

    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch(&std::fs::read_to_string(&sql_path).unwrap())
        .unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM ckpt", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 4);
}

#[test]
fn test_run_manifest() {
    let fixture = Fixture::with_one_item_per_category();
    let manifest_path = fixture.out().join("ckpt.manifest.json");

    let mut config = fixture.config();
    config.manifest_path = Some(manifest_path.clone());
    let summary = IngestPipeline::new(config).run().unwrap();

    let manifest: RunManifest =
        serde_json::from_str(&std::fs::read_to_string(&manifest_path).unwrap()).unwrap();
    assert_eq!(manifest.record_count, 4);
    assert_eq!(manifest.categories.len(), 4);
    assert_eq!(manifest.export_path, summary.export_path.clone());
    assert_eq!(manifest.export_bytes, summary.export_bytes);
    assert_eq!(
        manifest.export_sha256,
        ckpt_common::checksum::compute_file_sha256(&summary.export_path).unwrap()
    );
}
