//! Implementation-status tables.
//!
//! Loads the pro and community `implementation_coverage_full.csv` files and
//! merges them into one table of services and their operations.

use super::CoverageError;
use crate::models::OperationTable;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Location of the pro table below the implementation-details directory.
pub const PRO_TABLE: &str = "pro/implementation_coverage_full.csv";

/// Location of the community table below the implementation-details directory.
pub const COMMUNITY_TABLE: &str = "community/implementation_coverage_full.csv";

/// Protocol variant reported separately but folded into `sqs`.
pub const SQS_QUERY: &str = "sqs-query";

/// Implementation flags of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImplementationFlags {
    pub implemented: bool,
    /// Availability is attributed to the pro tier.
    pub pro: bool,
}

/// Service name -> operations with their flags.
pub type ImplementationTable = BTreeMap<String, OperationTable<ImplementationFlags>>;

/// One row of an implementation-status CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct ImplementationRow {
    pub service: String,
    pub operation: String,
    pub is_implemented: String,
}

impl ImplementationRow {
    fn implemented(&self) -> bool {
        self.is_implemented == "True"
    }
}

/// Read both tables below `dir` and merge them.
pub fn load_implementation_tables(dir: &Path) -> Result<ImplementationTable, CoverageError> {
    let pro = read_rows(&dir.join(PRO_TABLE))?;
    let community = read_rows(&dir.join(COMMUNITY_TABLE))?;
    debug!(
        "Loaded {} pro and {} community implementation rows",
        pro.len(),
        community.len()
    );

    Ok(build_status_table(&pro, &community))
}

/// Merge pro and community rows.
///
/// Pro rows are applied first and attribute every operation to pro. A
/// community row marked implemented moves an existing operation to
/// community without touching its implemented flag, or adds it as
/// implemented. Community rows marked not implemented only register the
/// service.
pub fn build_status_table(
    pro: &[ImplementationRow],
    community: &[ImplementationRow],
) -> ImplementationTable {
    let mut table = ImplementationTable::new();

    for row in pro.iter().filter(|r| r.service != SQS_QUERY) {
        table.entry(row.service.clone()).or_default().insert(
            &row.operation,
            ImplementationFlags {
                implemented: row.implemented(),
                pro: true,
            },
        );
    }

    for row in community.iter().filter(|r| r.service != SQS_QUERY) {
        let operations = table.entry(row.service.clone()).or_default();
        if !row.implemented() {
            continue;
        }
        match operations.get_mut(&row.operation) {
            Some(flags) => flags.pro = false,
            None => operations.insert(
                &row.operation,
                ImplementationFlags {
                    implemented: true,
                    pro: false,
                },
            ),
        }
    }

    table
}

fn read_rows(path: &Path) -> Result<Vec<ImplementationRow>, CoverageError> {
    if !path.is_file() {
        return Err(CoverageError::MissingImplementationTable {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::Reader::from_path(path).map_err(|source| CoverageError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    reader
        .deserialize()
        .collect::<Result<Vec<ImplementationRow>, _>>()
        .map_err(|source| CoverageError::Csv {
            path: path.to_path_buf(),
            source,
        })
}
