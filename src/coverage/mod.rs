//! Coverage data generation.
//!
//! Merges the implementation-status tables with raw test-run metrics and
//! writes one JSON data template per service.

pub mod aggregator;
pub mod implementation;
pub mod metrics;
pub mod serializer;

pub use aggregator::{aggregate_service, DropReason};
pub use implementation::load_implementation_tables;
pub use metrics::load_metric_files;
pub use serializer::{prepare_data_dir, write_document};

use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Coverage generation errors.
#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("Implementation table not found: {}", path.display())]
    MissingImplementationTable { path: PathBuf },

    #[error("Failed to read CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to scan {}: {message}", path.display())]
    Scan { path: PathBuf, message: String },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize coverage of {service}: {source}")]
    Json {
        service: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Inputs and switches of a coverage run.
#[derive(Debug, Clone)]
pub struct CoverageOptions {
    /// Directory holding `pro/` and `community/` implementation tables.
    pub implementation_details: PathBuf,
    /// Directory searched recursively for raw metric CSVs.
    pub raw_metrics: PathBuf,
    /// Directory receiving `data/<service>.json`.
    pub output_dir: PathBuf,
    /// Service display-name lookup; accepted but not used for the output.
    pub service_details: Option<PathBuf>,
    /// Wipe the data directory before writing.
    pub reset: bool,
    /// Show a progress bar while aggregating.
    pub show_progress: bool,
}

/// Summary of a finished coverage run.
#[derive(Debug, Clone, Default)]
pub struct CoverageRun {
    pub services: usize,
    pub metric_files: usize,
    pub metric_records: usize,
    pub written: Vec<PathBuf>,
    /// Rows applied to at least one service.
    pub accepted: usize,
    /// Dropped rows by reason, summed over all services.
    pub drops: BTreeMap<DropReason, usize>,
    /// Operations corrected to implemented by internal tests.
    pub corrected: usize,
}

/// Run the full coverage generation.
pub fn run(options: &CoverageOptions) -> Result<CoverageRun, CoverageError> {
    let table = load_implementation_tables(&options.implementation_details)?;
    info!("Loaded implementation status of {} services", table.len());

    if let Some(ref lookup) = options.service_details {
        debug!("Service details lookup given but unused: {}", lookup.display());
    }

    let files = load_metric_files(&options.raw_metrics)?;
    let mut run = CoverageRun {
        services: table.len(),
        metric_files: files.len(),
        metric_records: files.iter().map(|f| f.records.len()).sum(),
        ..CoverageRun::default()
    };
    info!(
        "Loaded {} metric records from {} files",
        run.metric_records, run.metric_files
    );

    let data_dir = prepare_data_dir(&options.output_dir, options.reset)?;

    let progress = progress_bar(table.len() as u64, options.show_progress);
    for (service, operations) in &table {
        progress.set_message(service.clone());

        let aggregation = aggregate_service(service, operations, &files);
        for (reason, count) in &aggregation.drops {
            *run.drops.entry(*reason).or_default() += count;
        }
        run.accepted += aggregation.accepted;
        run.corrected += aggregation.corrected;
        run.written.push(write_document(&data_dir, &aggregation.report)?);

        progress.inc(1);
    }
    progress.finish_and_clear();

    Ok(run)
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}
