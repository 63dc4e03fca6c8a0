//! Coverage document rendering.
//!
//! Turns a [`ServiceReport`] into the JSON data template consumed by the
//! documentation site and writes it to `<output>/data/<service>.json`.

use super::CoverageError;
use crate::models::{Availability, DetailsMap, OperationStatus, ServiceReport};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Subdirectory of the output directory holding the data templates.
pub const DATA_DIR: &str = "data";

/// Serialized form of a service report.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageDocument {
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pro_support: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_support: Option<bool>,
    /// One single-key map per operation, in table order.
    pub operations: Vec<BTreeMap<String, OperationStatus>>,
    pub details: DetailsMap,
}

/// Build the output document for a report.
///
/// Support flags are only present when true. Test lists are sorted by
/// response code, then node id; the map levels above are sorted by key.
pub fn build_document(report: &ServiceReport) -> CoverageDocument {
    let has = |wanted: Availability| {
        report
            .operations
            .iter()
            .any(|(_, status)| status.availability == wanted)
    };

    let operations = report
        .operations
        .iter()
        .map(|(name, status)| BTreeMap::from([(name.to_string(), status.clone())]))
        .collect();

    let mut details = report.details.clone();
    for tests in details
        .values_mut()
        .flat_map(|params| params.values_mut())
        .flat_map(|tiers| tiers.values_mut())
    {
        tests.sort_by(|a, b| {
            a.response
                .cmp(&b.response)
                .then_with(|| a.node_id.cmp(&b.node_id))
        });
    }

    CoverageDocument {
        service: report.service.clone(),
        pro_support: has(Availability::Pro).then_some(true),
        community_support: has(Availability::Community).then_some(true),
        operations,
        details,
    }
}

/// Render a report as pretty-printed JSON (2-space indent).
pub fn render_document(report: &ServiceReport) -> Result<String, CoverageError> {
    serde_json::to_string_pretty(&build_document(report)).map_err(|source| CoverageError::Json {
        service: report.service.clone(),
        source,
    })
}

/// Create the data directory, wiping it first when `reset` is set.
pub fn prepare_data_dir(output_dir: &Path, reset: bool) -> Result<PathBuf, CoverageError> {
    let data_dir = output_dir.join(DATA_DIR);
    let io_error = |source| CoverageError::Io {
        path: data_dir.clone(),
        source,
    };

    if reset && data_dir.is_dir() {
        info!("Removing existing data directory: {}", data_dir.display());
        std::fs::remove_dir_all(&data_dir).map_err(io_error)?;
    }

    std::fs::create_dir_all(&data_dir).map_err(io_error)?;
    Ok(data_dir)
}

/// Write the document of a report into `data_dir`.
pub fn write_document(data_dir: &Path, report: &ServiceReport) -> Result<PathBuf, CoverageError> {
    let content = render_document(report)?;
    let path = data_dir.join(format!("{}.json", report.service));

    std::fs::write(&path, content).map_err(|source| CoverageError::Io {
        path: path.clone(),
        source,
    })?;

    debug!("Wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OperationTable, TestDetail, Tier};
    use tempfile::TempDir;

    fn detail(response: &str, node_id: &str) -> TestDetail {
        TestDetail {
            node_id: node_id.to_string(),
            test: "test".to_string(),
            response: response.to_string(),
            error: String::new(),
            snapshot_skipped: String::new(),
            aws_validated: false,
            snapshot_tested: false,
            origin: String::new(),
        }
    }

    fn sample_report() -> ServiceReport {
        let mut operations = OperationTable::new();
        operations.insert("PutObject", OperationStatus::new(true, true));
        operations.insert("AbortMultipartUpload", OperationStatus::new(false, false));

        let mut details = DetailsMap::new();
        details
            .entry("PutObject".to_string())
            .or_default()
            .entry("Bucket, Key".to_string())
            .or_default()
            .insert(
                Tier::LsPro,
                vec![
                    detail("400", "LocalStack Pro: b"),
                    detail("200", "LocalStack Pro: z"),
                    detail("200", "LocalStack Pro: a"),
                ],
            );

        ServiceReport {
            service: "s3".to_string(),
            operations,
            details,
        }
    }

    #[test]
    fn test_support_flags_are_omitted_when_false() {
        let json = render_document(&sample_report()).unwrap();
        assert!(json.contains("\"pro_support\": true"));
        assert!(!json.contains("community_support"));
    }

    #[test]
    fn test_operations_keep_table_order() {
        let document = build_document(&sample_report());
        let names: Vec<_> = document
            .operations
            .iter()
            .flat_map(|op| op.keys().cloned())
            .collect();
        assert_eq!(names, vec!["PutObject", "AbortMultipartUpload"]);
    }

    #[test]
    fn test_details_sorted_by_response_then_node_id() {
        let document = build_document(&sample_report());
        let tests = &document.details["PutObject"]["Bucket, Key"][&Tier::LsPro];
        let order: Vec<_> = tests
            .iter()
            .map(|t| (t.response.as_str(), t.node_id.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("200", "LocalStack Pro: a"),
                ("200", "LocalStack Pro: z"),
                ("400", "LocalStack Pro: b"),
            ]
        );
    }

    #[test]
    fn test_render_layout() {
        let json = render_document(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["service"], "s3");
        assert_eq!(value["operations"][1]["AbortMultipartUpload"]["availability"], "");
        assert_eq!(value["operations"][0]["PutObject"]["availability"], "pro");
        assert!(value["details"]["PutObject"]["Bucket, Key"]["ls_pro"].is_array());
        // two-space indentation
        assert!(json.starts_with("{\n  \"service\": \"s3\""));
    }

    #[test]
    fn test_prepare_data_dir_reset() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = prepare_data_dir(temp_dir.path(), false).unwrap();
        std::fs::write(data_dir.join("stale.json"), "{}").unwrap();

        prepare_data_dir(temp_dir.path(), false).unwrap();
        assert!(data_dir.join("stale.json").exists());

        prepare_data_dir(temp_dir.path(), true).unwrap();
        assert!(!data_dir.join("stale.json").exists());
        assert!(data_dir.is_dir());
    }

    #[test]
    fn test_write_document() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = prepare_data_dir(temp_dir.path(), true).unwrap();
        let path = write_document(&data_dir, &sample_report()).unwrap();

        assert_eq!(path, data_dir.join("s3.json"));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("\"PutObject\""));
    }
}
