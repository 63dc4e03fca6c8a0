//! Figure shortcode rewriting.
//!
//! Replaces `{{< figure src="..." width="..." alt="..." >}}` shortcodes
//! with plain Markdown image syntax and keeps a changelog of every edit.

use crate::scanner::{FileScanner, ScanConfig};
use anyhow::{Context, Result};
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use tracing::debug;

const FIGURE_PATTERN: &str =
    r#"\{\{<\s*figure\s+src="([^"]+)"\s+width="[^"]*"\s+alt="([^"]+)"\s*>\}\}"#;

/// One replaced shortcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageChange {
    pub path: PathBuf,
    /// 1-indexed line number.
    pub line: usize,
    pub old_text: String,
    pub new_text: String,
}

impl ImageChange {
    /// Changelog line: `<path>:<line>: <old> -> <new>`.
    pub fn log_entry(&self) -> String {
        format!(
            "{}:{}: {} -> {}",
            self.path.display(),
            self.line,
            self.old_text,
            self.new_text
        )
    }
}

/// Shortcode rewriter.
pub struct ImageRewriter {
    pattern: Regex,
    prefix: String,
}

impl ImageRewriter {
    /// Create a rewriter pointing images at `prefix` (e.g. `/images/aws/`).
    pub fn new(prefix: &str) -> Result<Self> {
        let pattern = Regex::new(FIGURE_PATTERN).context("Invalid figure pattern")?;
        Ok(Self {
            pattern,
            prefix: prefix.to_string(),
        })
    }

    fn markdown_image(&self, caps: &Captures<'_>) -> String {
        format!("![{}]({}{})", &caps[2], self.prefix, &caps[1])
    }

    /// Rewrite `content`, returning the new text and the changes made.
    ///
    /// Line endings and untouched lines are preserved byte for byte.
    pub fn rewrite(&self, path: &Path, content: &str) -> (String, Vec<ImageChange>) {
        let mut changes = Vec::new();
        let mut output = String::with_capacity(content.len());

        for (index, line) in content.split_inclusive('\n').enumerate() {
            for caps in self.pattern.captures_iter(line) {
                changes.push(ImageChange {
                    path: path.to_path_buf(),
                    line: index + 1,
                    old_text: caps[0].to_string(),
                    new_text: self.markdown_image(&caps),
                });
            }

            let rewritten = self
                .pattern
                .replace_all(line, |caps: &Captures<'_>| self.markdown_image(caps));
            output.push_str(&rewritten);
        }

        (output, changes)
    }

    /// Rewrite a file in place when it contains shortcodes.
    pub fn process_file(&self, path: &Path) -> Result<Vec<ImageChange>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let (updated, changes) = self.rewrite(path, &content);
        if !changes.is_empty() {
            std::fs::write(path, updated)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            debug!("Rewrote {} figure(s) in {}", changes.len(), path.display());
        }

        Ok(changes)
    }
}

/// Rewrite every page below `dir` and write the changelog to `log_path`.
pub fn replace_images(
    dir: &Path,
    extensions: &[String],
    prefix: &str,
    log_path: &Path,
) -> Result<Vec<ImageChange>> {
    let rewriter = ImageRewriter::new(prefix)?;
    let scanner = FileScanner::new(dir.to_path_buf(), ScanConfig::recursive(extensions));

    let mut changes = Vec::new();
    for path in scanner.scan()? {
        changes.extend(rewriter.process_file(&path)?);
    }

    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut log = String::new();
    for change in &changes {
        log.push_str(&change.log_entry());
        log.push('\n');
    }
    std::fs::write(log_path, log)
        .with_context(|| format!("Failed to write log {}", log_path.display()))?;

    Ok(changes)
}
