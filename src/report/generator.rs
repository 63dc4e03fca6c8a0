//! Markdown report generation.
//!
//! This module generates Markdown reports from redirect test results.

use crate::models::{RedirectCheck, RedirectSummary};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(
    summary: &RedirectSummary,
    staging_url: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let mut output = String::new();

    output.push_str("# LocalStack Redirect Test Report\n");
    output.push_str(&format!(
        "**Generated:** {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!("**Staging URL:** {}\n\n", staging_url));

    output.push_str(&generate_summary_section(summary));
    output.push_str(&generate_failed_section(&summary.details));
    output.push_str(&generate_details_section(&summary.details));

    output
}

/// Generate the summary section.
fn generate_summary_section(summary: &RedirectSummary) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n");
    section.push_str(&format!("- **Total tests:** {}\n", summary.total));
    section.push_str(&format!("- **Passed:** {} ✅\n", summary.passed));
    section.push_str(&format!("- **Failed:** {} ❌\n", summary.failed));
    match summary.success_rate() {
        Some(rate) => section.push_str(&format!("- **Success rate:** {:.1}%\n", rate)),
        None => section.push_str("- **Success rate:** N/A\n"),
    }
    section.push('\n');

    section
}

/// Generate the failed tests section; empty when everything passed.
fn generate_failed_section(details: &[RedirectCheck]) -> String {
    let failed: Vec<_> = details.iter().filter(|d| !d.success).collect();
    if failed.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Failed Tests\n");

    for check in failed {
        section.push_str(&format!(
            "### {}: {}\n",
            check.product.to_uppercase(),
            check.old_url
        ));
        section.push_str(&format!("- **Expected:** {}\n", check.expected_new_url));
        section.push_str(&format!("- **Got:** {}\n", check.final_url));
        section.push_str(&format!("- **Status:** {}\n", check.status_code));
        section.push_str(&format!("- **Message:** {}\n\n", check.message));
    }

    section
}

/// Generate the per-test section.
fn generate_details_section(details: &[RedirectCheck]) -> String {
    let mut section = String::new();
    section.push_str("## All Test Details\n");

    for check in details {
        let icon = if check.success { "✅" } else { "❌" };
        section.push_str(&format!(
            "### {} {}: {}\n",
            icon,
            check.product.to_uppercase(),
            check.old_url
        ));
        section.push_str(&format!("- **Expected:** {}\n", check.expected_new_url));
        section.push_str(&format!("- **Final URL:** {}\n", check.final_url));
        section.push_str(&format!("- **Status Code:** {}\n", check.status_code));
        section.push_str(&format!("- **Message:** {}\n\n", check.message));
    }

    section
}

/// Write the report to a file.
pub fn write_report(
    summary: &RedirectSummary,
    staging_url: &str,
    generated_at: DateTime<Utc>,
    path: &Path,
) -> Result<()> {
    let content = generate_markdown_report(summary, staging_url, generated_at);

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;
    file.write_all(content.as_bytes())?;

    Ok(())
}
