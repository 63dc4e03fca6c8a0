//! Per-service aggregation of raw test metrics.
//!
//! Each metric row passes a filter pipeline that either turns it into an
//! [`Observation`] or rejects it with a [`DropReason`]. Observations are
//! folded into the operation's [`OperationStatus`], and internal test runs
//! are captured as [`TestDetail`] entries.

use super::implementation::{ImplementationFlags, SQS_QUERY};
use super::metrics::{MetricFile, MetricRecord};
use crate::models::{
    DetailsMap, OperationStatus, OperationTable, ServiceReport, TestDetail, Tier,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Response codes of external calls that are not counted as coverage.
pub const FAILING_EXTERNAL_CODES: [&str; 2] = ["500", "501"];

/// Parameter signature used for calls without parameters.
pub const NO_PARAMETERS: &str = "- (without any parameters)";

/// Exception label that hides the real error type in the response body.
const COMMON_SERVICE_EXCEPTION: &str = "CommonServiceException";

/// Service names whose raw rows count toward `service`.
///
/// `neptune` and `docdb` are served through the `rds` API, and `sqs` also
/// collects the `sqs-query` protocol variant.
pub fn services_of_interest(service: &str) -> Vec<String> {
    let lookup = match service {
        "neptune" | "docdb" => "rds",
        other => other,
    };

    let mut services = vec![lookup.to_string()];
    if service == "sqs" {
        services.push(SQS_QUERY.to_string());
    }
    services
}

/// Test suite a metrics file was recorded by, decided by its file stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestSource {
    /// Internal community or pro suite.
    Internal(Tier),
    /// Any other suite.
    External { terraform: bool },
}

impl TestSource {
    pub fn from_stem(stem: &str) -> Self {
        if stem.starts_with("community") {
            TestSource::Internal(Tier::LsCommunity)
        } else if stem.starts_with("pro") {
            TestSource::Internal(Tier::LsPro)
        } else {
            TestSource::External {
                terraform: stem.starts_with("terraform"),
            }
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, TestSource::Internal(_))
    }
}

/// Why a metric row did not contribute to a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DropReason {
    /// Row belongs to another service.
    ServiceNotOfInterest,
    /// Call made outside of a test (setup or background traffic).
    MissingNodeId,
    /// Test is marked as an expected failure.
    ExpectedFailure,
    /// Operation is not listed in the implementation tables.
    UnknownOperation,
    /// External test call answered with a server error.
    FailingExternalCall,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::ServiceNotOfInterest => write!(f, "service not of interest"),
            DropReason::MissingNodeId => write!(f, "missing node id"),
            DropReason::ExpectedFailure => write!(f, "xfail"),
            DropReason::UnknownOperation => write!(f, "unknown operation"),
            DropReason::FailingExternalCall => write!(f, "failing external call"),
        }
    }
}

/// A metric row accepted for one service.
#[derive(Debug, Clone)]
pub struct Observation<'a> {
    pub operation: &'a str,
    pub node_id: &'a str,
    pub source: TestSource,
    /// Test verified against the real service, directly or via snapshots.
    pub aws_validated: bool,
    /// Test used snapshots without skipping the whole verification.
    pub snapshot_tested: bool,
    pub record: &'a MetricRecord,
}

/// Run a metric row through the filter pipeline.
pub fn classify<'a>(
    record: &'a MetricRecord,
    source: TestSource,
    services: &[String],
    operations: &OperationTable<OperationStatus>,
) -> Result<Observation<'a>, DropReason> {
    let service = record.get("service").unwrap_or("");
    if !services.iter().any(|s| s == service) {
        return Err(DropReason::ServiceNotOfInterest);
    }

    let node_id = record
        .get("node_id")
        .filter(|id| !id.is_empty())
        .or_else(|| record.get("test_node_id").filter(|id| !id.is_empty()))
        .ok_or(DropReason::MissingNodeId)?;

    if record.is_true("xfail") {
        return Err(DropReason::ExpectedFailure);
    }

    let operation = record
        .get("operation")
        .filter(|op| operations.contains(op))
        .ok_or(DropReason::UnknownOperation)?;

    if !source.is_internal() {
        let code = record.get("response_code").unwrap_or("");
        if FAILING_EXTERNAL_CODES.contains(&code) {
            return Err(DropReason::FailingExternalCall);
        }
    }

    let snapshot_tested = record.is_true("snapshot")
        && record.get("snapshot_skipped_paths").unwrap_or("") != "all";
    let aws_validated = record.is_true("aws_validated") || snapshot_tested;

    Ok(Observation {
        operation,
        node_id,
        source,
        aws_validated,
        snapshot_tested,
        record,
    })
}

/// Fold an observation into an operation status.
///
/// Flags only move from `false` to `true`. An internal test hitting an
/// operation marked as not implemented marks it implemented in the tier
/// the test came from.
pub fn fold(mut status: OperationStatus, observation: &Observation<'_>) -> OperationStatus {
    match observation.source {
        TestSource::Internal(tier) => {
            status.internal_test_suite = true;
            if !status.implemented {
                status.implemented = true;
                status.availability = tier.availability();
            }
        }
        TestSource::External { terraform } => {
            status.external_test_suite = true;
            status.terraform_test_suite |= terraform;
        }
    }

    if observation.snapshot_tested {
        status.snapshot_tested = true;
        status.aws_validated = true;
    }
    status.aws_validated |= observation.aws_validated;

    status
}

/// Normalize the `parameters` column into a sorted signature.
///
/// A missing column becomes `"None"`; an empty one the no-parameters label.
pub fn parameter_signature(raw: Option<&str>) -> String {
    let mut params: Vec<&str> = raw.unwrap_or("None").split(',').collect();
    params.sort_unstable();

    let signature = params.join(", ");
    if signature.is_empty() {
        NO_PARAMETERS.to_string()
    } else {
        signature
    }
}

/// Short display name of a pytest node id.
///
/// Parameterized ids keep their `[...]` suffix even when it contains `::`,
/// e.g. `test_mod.py::TestFn::test_and_or[Fn::Or-0]` -> `test_and_or[Fn::Or-0]`.
pub fn simple_test_name(node_id: &str) -> String {
    if node_id.ends_with(']') {
        if let Some(bracket) = node_id.rfind('[') {
            let (head, params) = node_id.split_at(bracket);
            let name = head.rsplit("::").next().unwrap_or(head);
            return format!("{}{}", name, params);
        }
    }

    node_id.rsplit("::").next().unwrap_or(node_id).to_string()
}

/// Error label of a call, resolving `CommonServiceException` to the
/// `__type` reported in the response body when available.
pub fn error_label(record: &MetricRecord) -> String {
    let exception = record.get("exception").unwrap_or("");
    if exception != COMMON_SERVICE_EXCEPTION {
        return exception.to_string();
    }

    let response_data = record.get("response_data").unwrap_or("{}");
    match serde_json::from_str::<Value>(response_data) {
        Ok(data) => data
            .get("__type")
            .and_then(Value::as_str)
            .unwrap_or(exception)
            .to_string(),
        Err(e) => {
            debug!("Unparseable response_data for {}: {}", exception, e);
            exception.to_string()
        }
    }
}

/// Build the captured detail of an internal test observation.
pub fn capture_detail(observation: &Observation<'_>, tier: Tier) -> TestDetail {
    let record = observation.record;

    TestDetail {
        node_id: format!("{}: {}", tier.origin_label(), observation.node_id),
        test: simple_test_name(observation.node_id),
        response: record.get("response_code").unwrap_or("-1").to_string(),
        error: error_label(record),
        snapshot_skipped: record
            .get("snapshot_skipped_paths")
            .unwrap_or("")
            .to_string(),
        aws_validated: observation.aws_validated,
        snapshot_tested: observation.snapshot_tested,
        origin: record.get("origin").unwrap_or("").to_string(),
    }
}

/// Append a detail to its bucket unless an identical one is already there.
///
/// Returns whether the detail was added.
pub fn insert_detail(
    details: &mut DetailsMap,
    operation: &str,
    signature: String,
    tier: Tier,
    detail: TestDetail,
) -> bool {
    let bucket = details
        .entry(operation.to_string())
        .or_default()
        .entry(signature)
        .or_default()
        .entry(tier)
        .or_default();

    if bucket.contains(&detail) {
        false
    } else {
        bucket.push(detail);
        true
    }
}

/// Result of aggregating one service.
#[derive(Debug, Clone)]
pub struct ServiceAggregation {
    pub report: ServiceReport,
    /// Rejected rows by reason.
    pub drops: BTreeMap<DropReason, usize>,
    /// Rows folded into the report.
    pub accepted: usize,
    /// Operations flipped to implemented by an internal test.
    pub corrected: usize,
}

/// Initial status table of a service.
pub fn init_statuses(
    operations: &OperationTable<ImplementationFlags>,
) -> OperationTable<OperationStatus> {
    let mut statuses = OperationTable::new();
    for (name, flags) in operations.iter() {
        statuses.insert(name, OperationStatus::new(flags.implemented, flags.pro));
    }
    statuses
}

/// Aggregate all metric files into the report of `service`.
pub fn aggregate_service(
    service: &str,
    operations: &OperationTable<ImplementationFlags>,
    files: &[MetricFile],
) -> ServiceAggregation {
    let services = services_of_interest(service);
    let mut statuses = init_statuses(operations);
    let mut details = DetailsMap::new();
    let mut drops: BTreeMap<DropReason, usize> = BTreeMap::new();
    let mut accepted = 0;
    let mut corrected = 0;

    for file in files {
        let source = TestSource::from_stem(&file.stem);

        for record in &file.records {
            let observation = match classify(record, source, &services, &statuses) {
                Ok(observation) => observation,
                Err(reason) => {
                    if reason == DropReason::FailingExternalCall {
                        warn!(
                            "skipping {}.{}: response_code {} ({})",
                            record.get("service").unwrap_or(""),
                            record.get("operation").unwrap_or(""),
                            record.get("response_code").unwrap_or(""),
                            file.path.display()
                        );
                    }
                    *drops.entry(reason).or_default() += 1;
                    continue;
                }
            };

            // classify only accepts operations of the status table
            let Some(status) = statuses.get_mut(observation.operation) else {
                *drops.entry(DropReason::UnknownOperation).or_default() += 1;
                continue;
            };
            accepted += 1;

            let was_implemented = status.implemented;
            *status = fold(status.clone(), &observation);

            if !was_implemented && status.implemented {
                corrected += 1;
                warn!(
                    "{}.{} classified as 'not implemented', but found a test calling it: ({}) {}",
                    record.get("service").unwrap_or(service),
                    observation.operation,
                    match observation.source {
                        TestSource::Internal(tier) => tier.to_string(),
                        TestSource::External { .. } => "external".to_string(),
                    },
                    observation.node_id
                );
            }

            if let TestSource::Internal(tier) = observation.source {
                let signature = parameter_signature(record.get("parameters"));
                let detail = capture_detail(&observation, tier);
                insert_detail(&mut details, observation.operation, signature, tier, detail);
            }
        }
    }

    debug!(
        "{}: {} operations, {} rows accepted, dropped {:?}",
        service,
        statuses.len(),
        accepted,
        drops
    );

    ServiceAggregation {
        report: ServiceReport {
            service: service.to_string(),
            operations: statuses,
            details,
        },
        drops,
        accepted,
        corrected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Availability;

    fn flags(implemented: bool, pro: bool) -> ImplementationFlags {
        ImplementationFlags { implemented, pro }
    }

    fn s3_operations() -> OperationTable<ImplementationFlags> {
        let mut ops = OperationTable::new();
        ops.insert("PutObject", flags(true, false));
        ops.insert("GetObject", flags(true, true));
        ops.insert("SelectObjectContent", flags(false, true));
        ops
    }

    fn row(pairs: &[(&str, &str)]) -> MetricRecord {
        MetricRecord::from_pairs(pairs.iter().copied())
    }

    fn file(stem: &str, records: Vec<MetricRecord>) -> MetricFile {
        MetricFile {
            path: format!("{}.csv", stem).into(),
            stem: stem.to_string(),
            records,
        }
    }

    fn put_object_row() -> MetricRecord {
        row(&[
            ("service", "s3"),
            ("operation", "PutObject"),
            ("node_id", "tests/aws/s3/test_s3.py::TestS3::test_put_object"),
            ("parameters", "Key,Bucket,Body"),
            ("response_code", "200"),
            ("snapshot", "True"),
            ("snapshot_skipped_paths", ""),
            ("origin", "internal"),
        ])
    }

    #[test]
    fn test_services_of_interest() {
        assert_eq!(services_of_interest("s3"), vec!["s3"]);
        assert_eq!(services_of_interest("docdb"), vec!["rds"]);
        assert_eq!(services_of_interest("neptune"), vec!["rds"]);
        assert_eq!(services_of_interest("sqs"), vec!["sqs", "sqs-query"]);
    }

    #[test]
    fn test_source_from_stem() {
        assert_eq!(
            TestSource::from_stem("community-integration-tests"),
            TestSource::Internal(Tier::LsCommunity)
        );
        assert_eq!(TestSource::from_stem("pro_run"), TestSource::Internal(Tier::LsPro));
        assert_eq!(
            TestSource::from_stem("terraform-aws-s3"),
            TestSource::External { terraform: true }
        );
        assert_eq!(
            TestSource::from_stem("cdk-smoke"),
            TestSource::External { terraform: false }
        );
    }

    #[test]
    fn test_classify_drop_reasons() {
        let statuses = init_statuses(&s3_operations());
        let services = services_of_interest("s3");
        let internal = TestSource::Internal(Tier::LsCommunity);
        let external = TestSource::External { terraform: false };

        let other_service = row(&[("service", "sqs"), ("operation", "PutObject"), ("node_id", "t")]);
        assert_eq!(
            classify(&other_service, internal, &services, &statuses).unwrap_err(),
            DropReason::ServiceNotOfInterest
        );

        let background = row(&[("service", "s3"), ("operation", "PutObject"), ("node_id", "")]);
        assert_eq!(
            classify(&background, internal, &services, &statuses).unwrap_err(),
            DropReason::MissingNodeId
        );

        let xfail = row(&[
            ("service", "s3"),
            ("operation", "PutObject"),
            ("test_node_id", "t"),
            ("xfail", "TRUE"),
        ]);
        assert_eq!(
            classify(&xfail, internal, &services, &statuses).unwrap_err(),
            DropReason::ExpectedFailure
        );

        let phantom = row(&[("service", "s3"), ("operation", "PostObject"), ("node_id", "t")]);
        assert_eq!(
            classify(&phantom, internal, &services, &statuses).unwrap_err(),
            DropReason::UnknownOperation
        );

        let failing = row(&[
            ("service", "s3"),
            ("operation", "PutObject"),
            ("node_id", "t"),
            ("response_code", "501"),
        ]);
        assert_eq!(
            classify(&failing, external, &services, &statuses).unwrap_err(),
            DropReason::FailingExternalCall
        );
        // internal tests keep server errors
        assert!(classify(&failing, internal, &services, &statuses).is_ok());
    }

    #[test]
    fn test_classify_uses_test_node_id_fallback() {
        let statuses = init_statuses(&s3_operations());
        let record = row(&[
            ("service", "s3"),
            ("operation", "GetObject"),
            ("node_id", ""),
            ("test_node_id", "tests/test_s3.py::test_get"),
        ]);
        let observation = classify(
            &record,
            TestSource::Internal(Tier::LsPro),
            &services_of_interest("s3"),
            &statuses,
        )
        .unwrap();
        assert_eq!(observation.node_id, "tests/test_s3.py::test_get");
    }

    #[test]
    fn test_snapshot_flags() {
        let statuses = init_statuses(&s3_operations());
        let services = services_of_interest("s3");
        let source = TestSource::Internal(Tier::LsCommunity);

        let record = put_object_row();
        let observation = classify(&record, source, &services, &statuses).unwrap();
        assert!(observation.snapshot_tested);
        assert!(observation.aws_validated);

        let skipped_all = row(&[
            ("service", "s3"),
            ("operation", "PutObject"),
            ("node_id", "t"),
            ("snapshot", "true"),
            ("snapshot_skipped_paths", "all"),
        ]);
        let observation = classify(&skipped_all, source, &services, &statuses).unwrap();
        assert!(!observation.snapshot_tested);
        assert!(!observation.aws_validated);

        let validated = row(&[
            ("service", "s3"),
            ("operation", "PutObject"),
            ("node_id", "t"),
            ("aws_validated", "True"),
        ]);
        let observation = classify(&validated, source, &services, &statuses).unwrap();
        assert!(!observation.snapshot_tested);
        assert!(observation.aws_validated);
    }

    #[test]
    fn test_fold_is_monotonic() {
        let record = put_object_row();
        let statuses = init_statuses(&s3_operations());
        let services = services_of_interest("s3");
        let snapshot = classify(&record, TestSource::Internal(Tier::LsCommunity), &services, &statuses)
            .unwrap();

        let plain_record = row(&[("service", "s3"), ("operation", "PutObject"), ("node_id", "t")]);
        let plain = classify(
            &plain_record,
            TestSource::External { terraform: true },
            &services,
            &statuses,
        )
        .unwrap();

        let status = OperationStatus::new(true, false);
        let status = fold(status, &snapshot);
        let status = fold(status, &plain);

        assert!(status.internal_test_suite);
        assert!(status.external_test_suite);
        assert!(status.terraform_test_suite);
        assert!(status.snapshot_tested);
        assert!(status.aws_validated);
        assert_eq!(status.availability, Availability::Community);
    }

    #[test]
    fn test_fold_marks_unimplemented_operation() {
        let record = row(&[
            ("service", "s3"),
            ("operation", "SelectObjectContent"),
            ("node_id", "t"),
        ]);
        let statuses = init_statuses(&s3_operations());
        let observation = classify(
            &record,
            TestSource::Internal(Tier::LsPro),
            &services_of_interest("s3"),
            &statuses,
        )
        .unwrap();

        let before = statuses.get("SelectObjectContent").unwrap().clone();
        assert_eq!(before.availability, Availability::Unavailable);

        let after = fold(before, &observation);
        assert!(after.implemented);
        assert_eq!(after.availability, Availability::Pro);
    }

    #[test]
    fn test_external_hit_does_not_mark_implemented() {
        let record = row(&[
            ("service", "s3"),
            ("operation", "SelectObjectContent"),
            ("node_id", "t"),
        ]);
        let statuses = init_statuses(&s3_operations());
        let observation = classify(
            &record,
            TestSource::External { terraform: false },
            &services_of_interest("s3"),
            &statuses,
        )
        .unwrap();

        let after = fold(statuses.get("SelectObjectContent").unwrap().clone(), &observation);
        assert!(!after.implemented);
        assert_eq!(after.availability, Availability::Unavailable);
    }

    #[test]
    fn test_parameter_signature() {
        assert_eq!(parameter_signature(Some("Key,Bucket,Body")), "Body, Bucket, Key");
        assert_eq!(parameter_signature(Some("")), NO_PARAMETERS);
        assert_eq!(parameter_signature(None), "None");
        assert_eq!(parameter_signature(Some("QueueUrl")), "QueueUrl");
    }

    #[test]
    fn test_simple_test_name() {
        assert_eq!(
            simple_test_name("tests/aws/s3/test_s3.py::TestS3::test_put_object"),
            "test_put_object"
        );
        assert_eq!(
            simple_test_name(
                "tests/integration/mytest.py::SomeTest::test_and_or_functions[Fn::Or-0-0-False]"
            ),
            "test_and_or_functions[Fn::Or-0-0-False]"
        );
        assert_eq!(simple_test_name("test_plain"), "test_plain");
    }

    #[test]
    fn test_error_label() {
        let plain = row(&[("exception", "NoSuchBucket")]);
        assert_eq!(error_label(&plain), "NoSuchBucket");

        let resolved = row(&[
            ("exception", "CommonServiceException"),
            ("response_data", r#"{"__type": "InvalidParameterValue", "message": "bad"}"#),
        ]);
        assert_eq!(error_label(&resolved), "InvalidParameterValue");

        let malformed = row(&[
            ("exception", "CommonServiceException"),
            ("response_data", "<xml/>"),
        ]);
        assert_eq!(error_label(&malformed), "CommonServiceException");

        let no_type = row(&[("exception", "CommonServiceException")]);
        assert_eq!(error_label(&no_type), "CommonServiceException");

        assert_eq!(error_label(&row(&[])), "");
    }

    #[test]
    fn test_capture_detail() {
        let record = put_object_row();
        let statuses = init_statuses(&s3_operations());
        let observation = classify(
            &record,
            TestSource::Internal(Tier::LsCommunity),
            &services_of_interest("s3"),
            &statuses,
        )
        .unwrap();

        let detail = capture_detail(&observation, Tier::LsCommunity);
        assert_eq!(
            detail.node_id,
            "LocalStack Community: tests/aws/s3/test_s3.py::TestS3::test_put_object"
        );
        assert_eq!(detail.test, "test_put_object");
        assert_eq!(detail.response, "200");
        assert_eq!(detail.error, "");
        assert!(detail.snapshot_tested);
        assert_eq!(detail.origin, "internal");
    }

    #[test]
    fn test_aggregate_deduplicates_details() {
        let files = vec![
            file("community-integration", vec![put_object_row(), put_object_row()]),
            file("community-integration-rerun", vec![put_object_row()]),
        ];

        let aggregation = aggregate_service("s3", &s3_operations(), &files);
        let bucket = &aggregation.report.details["PutObject"]["Body, Bucket, Key"][&Tier::LsCommunity];
        assert_eq!(bucket.len(), 1);
        assert_eq!(aggregation.accepted, 3);
    }

    #[test]
    fn test_aggregate_drops_unknown_and_failing_rows() {
        let files = vec![
            file(
                "community-integration",
                vec![row(&[("service", "s3"), ("operation", "PostObject"), ("node_id", "t")])],
            ),
            file(
                "terraform-s3",
                vec![row(&[
                    ("service", "s3"),
                    ("operation", "GetObject"),
                    ("node_id", "t"),
                    ("response_code", "501"),
                ])],
            ),
        ];

        let aggregation = aggregate_service("s3", &s3_operations(), &files);
        assert!(aggregation.report.details.is_empty());
        assert_eq!(aggregation.drops.get(&DropReason::UnknownOperation), Some(&1));
        assert_eq!(aggregation.drops.get(&DropReason::FailingExternalCall), Some(&1));

        let get_object = aggregation.report.operations.get("GetObject").unwrap();
        assert!(!get_object.external_test_suite);
        assert!(!get_object.terraform_test_suite);
    }

    #[test]
    fn test_aggregate_every_row_is_folded_or_dropped() {
        let files = vec![
            file(
                "community-integration",
                vec![
                    put_object_row(),
                    row(&[("service", "s3"), ("operation", "PostObject"), ("node_id", "t")]),
                    row(&[("service", "sqs"), ("operation", "SendMessage"), ("node_id", "t")]),
                    row(&[("service", "s3"), ("operation", "GetObject")]),
                ],
            ),
            file(
                "pro-integration",
                vec![row(&[
                    ("service", "s3"),
                    ("operation", "GetObject"),
                    ("node_id", "tests/test_s3.py::test_get"),
                    ("xfail", "true"),
                ])],
            ),
            file(
                "external-suite",
                vec![row(&[
                    ("service", "s3"),
                    ("operation", "GetObject"),
                    ("test_node_id", "suite::get"),
                    ("response_code", "200"),
                ])],
            ),
        ];
        let total: usize = files.iter().map(|f| f.records.len()).sum();

        let aggregation = aggregate_service("s3", &s3_operations(), &files);
        let dropped: usize = aggregation.drops.values().sum();
        assert_eq!(aggregation.accepted, 2);
        assert_eq!(aggregation.accepted + dropped, total);

        let put = aggregation.report.operations.get("PutObject").unwrap();
        assert!(put.internal_test_suite);
        let get = aggregation.report.operations.get("GetObject").unwrap();
        assert!(get.external_test_suite);
        assert!(!get.internal_test_suite);
    }

    #[test]
    fn test_aggregate_external_rows_have_no_details() {
        let files = vec![file(
            "terraform-s3",
            vec![row(&[
                ("service", "s3"),
                ("operation", "GetObject"),
                ("node_id", "t"),
                ("response_code", "200"),
            ])],
        )];

        let aggregation = aggregate_service("s3", &s3_operations(), &files);
        let status = aggregation.report.operations.get("GetObject").unwrap();
        assert!(status.external_test_suite);
        assert!(status.terraform_test_suite);
        assert!(!status.internal_test_suite);
        assert!(aggregation.report.details.is_empty());
    }

    #[test]
    fn test_aggregate_alias_rds_rows_for_docdb() {
        let mut ops = OperationTable::new();
        ops.insert("CreateDBCluster", flags(true, true));

        let files = vec![file(
            "pro-integration",
            vec![row(&[
                ("service", "rds"),
                ("operation", "CreateDBCluster"),
                ("node_id", "tests/aws/test_docdb.py::test_create_cluster"),
                ("parameters", "Engine"),
            ])],
        )];

        let aggregation = aggregate_service("docdb", &ops, &files);
        let status = aggregation.report.operations.get("CreateDBCluster").unwrap();
        assert!(status.internal_test_suite);
        assert!(aggregation.report.details["CreateDBCluster"]["Engine"].contains_key(&Tier::LsPro));
    }

    #[test]
    fn test_aggregate_sqs_collects_sqs_query_rows() {
        let mut ops = OperationTable::new();
        ops.insert("SendMessage", flags(true, false));

        let files = vec![file(
            "community-integration",
            vec![row(&[
                ("service", "sqs-query"),
                ("operation", "SendMessage"),
                ("node_id", "tests/aws/test_sqs.py::test_send"),
            ])],
        )];

        let aggregation = aggregate_service("sqs", &ops, &files);
        assert!(aggregation.report.operations.get("SendMessage").unwrap().internal_test_suite);
    }

    #[test]
    fn test_aggregate_counts_corrections() {
        let files = vec![file(
            "pro-integration",
            vec![row(&[
                ("service", "s3"),
                ("operation", "SelectObjectContent"),
                ("node_id", "tests/test_s3.py::test_select"),
            ])],
        )];

        let aggregation = aggregate_service("s3", &s3_operations(), &files);
        assert_eq!(aggregation.corrected, 1);
        let status = aggregation.report.operations.get("SelectObjectContent").unwrap();
        assert!(status.implemented);
        assert_eq!(status.availability, Availability::Pro);
    }
}
