//! Raw test-run metrics.
//!
//! Every CSV below the raw-metrics directory holds one recorded API call
//! per row. Columns vary between files, so rows are kept as string maps.

use super::CoverageError;
use crate::scanner::{FileScanner, ScanConfig};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One recorded call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricRecord {
    fields: HashMap<String, String>,
}

impl MetricRecord {
    /// Build a record from column/value pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of a column, `None` when the row does not carry it.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Column value compared case-insensitively against `"true"`.
    pub fn is_true(&self, column: &str) -> bool {
        self.get(column)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

/// A parsed metrics file.
#[derive(Debug, Clone)]
pub struct MetricFile {
    pub path: PathBuf,
    /// File name without extension; decides the test source.
    pub stem: String,
    pub records: Vec<MetricRecord>,
}

/// Parse every `*.csv` below `dir`, sorted by path.
///
/// A missing directory yields no files.
pub fn load_metric_files(dir: &Path) -> Result<Vec<MetricFile>, CoverageError> {
    if !dir.is_dir() {
        warn!("Raw metrics directory not found: {}", dir.display());
        return Ok(Vec::new());
    }

    let scanner = FileScanner::new(dir.to_path_buf(), ScanConfig::recursive(&["csv"]));
    let paths = scanner.scan().map_err(|e| CoverageError::Scan {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })?;

    paths.iter().map(|path| read_metric_file(path)).collect()
}

/// Parse a single metrics file. Undecodable rows are skipped.
pub fn read_metric_file(path: &Path) -> Result<MetricFile, CoverageError> {
    let csv_error = |source| CoverageError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;
    let headers = reader.headers().map_err(csv_error)?.clone();

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        match result {
            Ok(row) => records.push(MetricRecord::from_pairs(
                headers.iter().zip(row.iter()),
            )),
            Err(e) => debug!("Skipping row {} of {}: {}", index + 1, path.display(), e),
        }
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    debug!("Read {} records from {}", records.len(), path.display());

    Ok(MetricFile {
        path: path.to_path_buf(),
        stem,
        records,
    })
}
