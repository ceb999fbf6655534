//! ckpt-ingest - Checkpoint metadata ingestion tool

use anyhow::Result;
use ckpt_common::logging::{init_logging, LogConfig, LogLevel};
use ckpt_common::Category;
use ckpt_ingest::config::{DEFAULT_EXPORT_PATH, DEFAULT_ROOT, DEFAULT_TABLE_PATH};
use ckpt_ingest::export::ParquetCompression;
use ckpt_ingest::metadata::METADATA_FILE_NAME;
use ckpt_ingest::{IngestConfig, IngestPipeline};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "ckpt-ingest")]
#[command(author, version, about = "Load checkpoint metadata into a table and export it to Parquet")]
struct Cli {
    /// Directory containing the category folders
    #[arg(long, env = "CKPT_ROOT", default_value = DEFAULT_ROOT)]
    root: PathBuf,

    /// Table store file, recreated on every run
    #[arg(long, env = "CKPT_TABLE_PATH", default_value = DEFAULT_TABLE_PATH)]
    table: PathBuf,

    /// Parquet file to export to
    #[arg(long, env = "CKPT_EXPORT_PATH", default_value = DEFAULT_EXPORT_PATH)]
    export: PathBuf,

    /// Parquet compression (snappy, zstd, gzip, none)
    #[arg(long, env = "CKPT_COMPRESSION", default_value_t = ParquetCompression::Snappy)]
    compression: ParquetCompression,

    /// Categories to scan, comma separated (default: all)
    #[arg(long, value_delimiter = ',')]
    categories: Vec<Category>,

    /// Metadata file name inside each item directory
    #[arg(long, default_value = METADATA_FILE_NAME)]
    metadata_file: String,

    /// Also write the exported rows as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Also write a replayable SQL dump
    #[arg(long)]
    sql_dump: Option<PathBuf>,

    /// Write a JSON run manifest
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Show a progress bar while loading
    #[arg(long)]
    progress: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> ckpt_ingest::Result<IngestConfig> {
        let categories = if self.categories.is_empty() {
            Category::ALL.to_vec()
        } else {
            self.categories
        };

        IngestConfig::builder()
            .root(self.root)
            .categories(categories)
            .metadata_file(self.metadata_file)
            .table_path(self.table)
            .export_path(self.export)
            .compression(self.compression)
            .csv_path(self.csv)
            .sql_dump_path(self.sql_dump)
            .manifest_path(self.manifest)
            .show_progress(self.progress)
            .build()
    }
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("ckpt-ingest")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    let guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match run(cli) {
        Ok(()) => 0,
        Err(e) => {
            error!(error = %e, "Ingestion failed");
            eprintln!("Error: {}", e);
            1
        }
    };

    // Flush file logs before exiting
    drop(guard);
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.into_config()?;
    let summary = IngestPipeline::new(config).run()?;

    for line in summary.report_lines() {
        println!("{}", line);
    }

    info!("Ingestion complete");
    Ok(())
}
