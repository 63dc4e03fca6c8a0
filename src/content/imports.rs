//! Component import insertion.
//!
//! Adds an import statement right after the frontmatter block of each MDX
//! page in a directory.

use crate::scanner::{FileScanner, ScanConfig};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings for an import run.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Directory whose top-level pages are processed.
    pub dir: PathBuf,
    /// Extension of the pages, without the dot.
    pub extension: String,
    /// Substring that marks the import as already present.
    pub marker: String,
    /// Line inserted after the frontmatter.
    pub import_line: String,
}

/// What happened to a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Added,
    AlreadyPresent,
    NoFrontmatter,
}

/// Totals over an import run.
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub processed: usize,
    pub skipped: usize,
    pub files: Vec<(PathBuf, ImportOutcome)>,
}

/// Insert the import into `content`.
///
/// Fails with the skip outcome when the marker is already present or the
/// content has no closed frontmatter block (a second `---` line).
pub fn insert_import(content: &str, marker: &str, import_line: &str) -> Result<String, ImportOutcome> {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();

    if lines.iter().any(|line| line.contains(marker)) {
        return Err(ImportOutcome::AlreadyPresent);
    }

    let frontmatter_end = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.trim() == "---")
        .nth(1)
        .map(|(i, _)| i)
        .ok_or(ImportOutcome::NoFrontmatter)?;

    let mut output = String::with_capacity(content.len() + import_line.len() + 2);
    for (i, line) in lines.iter().enumerate() {
        output.push_str(line);
        if i == frontmatter_end {
            output.push('\n');
            output.push_str(import_line);
            output.push('\n');
        }
    }

    Ok(output)
}

/// Add the import to a single file, writing it back when changed.
pub fn add_import_to_file(path: &Path, marker: &str, import_line: &str) -> Result<ImportOutcome> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    match insert_import(&content, marker, import_line) {
        Ok(updated) => {
            std::fs::write(path, updated)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(ImportOutcome::Added)
        }
        Err(outcome) => Ok(outcome),
    }
}

/// Process every page of the configured directory.
pub fn add_imports(options: &ImportOptions) -> Result<ImportSummary> {
    let scanner = FileScanner::new(options.dir.clone(), ScanConfig::flat(&[&options.extension]));
    let files = scanner.scan()?;
    debug!("Found {} pages in {}", files.len(), options.dir.display());

    let mut summary = ImportSummary::default();
    for path in files {
        let outcome = add_import_to_file(&path, &options.marker, &options.import_line)?;
        if outcome == ImportOutcome::Added {
            summary.processed += 1;
        } else {
            summary.skipped += 1;
        }
        summary.files.push((path, outcome));
    }

    Ok(summary)
}
