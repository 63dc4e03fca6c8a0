//! Data models for the documentation toolkit.
//!
//! This module contains the core data structures shared across the
//! subcommands: coverage status records, captured test details, and
//! redirect configuration entries.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Support level under which an operation is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Availability {
    /// Not implemented in any tier.
    #[default]
    #[serde(rename = "")]
    Unavailable,
    /// Available in the community edition.
    #[serde(rename = "community")]
    Community,
    /// Available in the pro edition only.
    #[serde(rename = "pro")]
    Pro,
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Unavailable => write!(f, ""),
            Availability::Community => write!(f, "community"),
            Availability::Pro => write!(f, "pro"),
        }
    }
}

/// Internal test suite a test run belongs to.
///
/// Variant order matches the alphabetical order of the serialized names,
/// so a `BTreeMap<Tier, _>` serializes its keys sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "ls_community")]
    LsCommunity,
    #[serde(rename = "ls_pro")]
    LsPro,
}

impl Tier {
    /// Human-readable label prefixed to captured node ids.
    pub fn origin_label(&self) -> &'static str {
        match self {
            Tier::LsCommunity => "LocalStack Community",
            Tier::LsPro => "LocalStack Pro",
        }
    }

    /// Availability granted when this tier proves an operation is implemented.
    pub fn availability(&self) -> Availability {
        match self {
            Tier::LsCommunity => Availability::Community,
            Tier::LsPro => Availability::Pro,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::LsCommunity => write!(f, "ls_community"),
            Tier::LsPro => write!(f, "ls_pro"),
        }
    }
}

/// Coverage status of a single operation of a service.
///
/// Every boolean flag only ever flips from `false` to `true` while test
/// records are folded in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationStatus {
    /// Whether the operation is implemented.
    pub implemented: bool,
    /// Tier the operation is available in; empty when not implemented.
    pub availability: Availability,
    /// Covered by the internal (community or pro) test suites.
    pub internal_test_suite: bool,
    /// Covered by an external test suite.
    pub external_test_suite: bool,
    /// Covered by the terraform test suite.
    pub terraform_test_suite: bool,
    /// Behavior confirmed against the real cloud service.
    pub aws_validated: bool,
    /// Covered by a snapshot test that verifies at least part of the response.
    pub snapshot_tested: bool,
    /// Snapshot paths skipped during verification.
    pub snapshot_skipped: String,
}

impl OperationStatus {
    /// Creates the initial status from the implementation tables.
    pub fn new(implemented: bool, pro: bool) -> Self {
        let availability = match (implemented, pro) {
            (false, _) => Availability::Unavailable,
            (true, true) => Availability::Pro,
            (true, false) => Availability::Community,
        };

        Self {
            implemented,
            availability,
            internal_test_suite: false,
            external_test_suite: false,
            terraform_test_suite: false,
            aws_validated: false,
            snapshot_tested: false,
            snapshot_skipped: String::new(),
        }
    }
}

/// One observed internal test invocation of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDetail {
    /// Origin-prefixed pytest node id.
    pub node_id: String,
    /// Short display name of the test.
    pub test: String,
    /// Response code of the recorded call.
    pub response: String,
    /// Error or exception label; empty when the call succeeded.
    pub error: String,
    /// Snapshot paths skipped during verification.
    pub snapshot_skipped: String,
    /// Test was validated against the real cloud service.
    pub aws_validated: bool,
    /// Test used snapshot verification.
    pub snapshot_tested: bool,
    /// Origin tag recorded with the call.
    pub origin: String,
}

/// Operation name -> parameter signature -> tier -> captured tests.
///
/// `BTreeMap` keeps every level sorted for serialization.
pub type DetailsMap = BTreeMap<String, BTreeMap<String, BTreeMap<Tier, Vec<TestDetail>>>>;

/// Map keyed by operation name that remembers insertion order.
///
/// Overwriting an existing key keeps its original position.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationTable<T> {
    entries: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> Default for OperationTable<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> OperationTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the value for `name`.
    pub fn insert(&mut self, name: &str, value: T) {
        match self.index.get(name) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), value));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|&pos| &self.entries[pos].1)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        match self.index.get(name) {
            Some(&pos) => Some(&mut self.entries[pos].1),
            None => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Aggregated coverage of one service, ready for serialization.
#[derive(Debug, Clone)]
pub struct ServiceReport {
    /// Service name.
    pub service: String,
    /// Status per operation, in implementation-table order.
    pub operations: OperationTable<OperationStatus>,
    /// Captured internal test details.
    pub details: DetailsMap,
}

/// A single redirect rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectEntry {
    /// Path on the old site.
    pub old_link: String,
    /// Path the old link should redirect to.
    pub new_link: String,
    /// HTTP status used for the redirect.
    #[serde(default = "default_status_code")]
    pub status_code: u16,
    /// Reviewer note left in generated templates.
    #[serde(rename = "_note", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

fn default_status_code() -> u16 {
    301
}

/// Redirect rules grouped by product (e.g. `aws`, `snowflake`).
pub type RedirectConfig = BTreeMap<String, Vec<RedirectEntry>>;

/// Outcome of checking one redirect against the staging site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectCheck {
    /// Product section the rule came from.
    pub product: String,
    /// Path requested on the staging site.
    pub old_url: String,
    /// Path the request was expected to end on.
    pub expected_new_url: String,
    /// URL the request actually ended on; empty when the request failed.
    pub final_url: String,
    /// Final HTTP status; 0 when the request failed.
    pub status_code: u16,
    /// Whether the redirect landed where expected.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
}

/// Totals over a redirect test run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedirectSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub details: Vec<RedirectCheck>,
}

impl RedirectSummary {
    /// Records a check and updates the counters.
    pub fn record(&mut self, check: RedirectCheck) {
        self.total += 1;
        if check.success {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.details.push(check);
    }

    /// Percentage of passed checks, or `None` when nothing ran.
    pub fn success_rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.passed as f64 / self.total as f64 * 100.0)
        }
    }
}
