//! File scanner for discovering input files.
//!
//! This module provides a unified file scanner used by every subcommand:
//! raw metric CSVs for the coverage run, MDX pages for import insertion,
//! and Markdown pages for image rewrites.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Configuration for file scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions to include, without the dot (e.g., ["md", "mdx"])
    pub extensions: Vec<String>,
    /// Descend into subdirectories
    pub recursive: bool,
}

impl ScanConfig {
    /// Scan recursively for the given extensions.
    pub fn recursive<S: AsRef<str>>(extensions: &[S]) -> Self {
        Self {
            extensions: extensions.iter().map(|e| e.as_ref().to_string()).collect(),
            recursive: true,
        }
    }

    /// Scan only the top level of the root directory.
    pub fn flat<S: AsRef<str>>(extensions: &[S]) -> Self {
        Self {
            recursive: false,
            ..Self::recursive(extensions)
        }
    }
}

/// File scanner rooted at a directory.
pub struct FileScanner {
    config: ScanConfig,
    root: PathBuf,
}

impl FileScanner {
    /// Create a new file scanner.
    pub fn new(root: PathBuf, config: ScanConfig) -> Self {
        Self { config, root }
    }

    /// Scan for all matching files, sorted by path.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(anyhow::anyhow!(
                "Directory not found: {}",
                self.root.display()
            ));
        }

        let mut walker = WalkDir::new(&self.root).sort_by_file_name();
        if !self.config.recursive {
            walker = walker.max_depth(1);
        }

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Cannot read entry under {}: {}", self.root.display(), e);
                    continue;
                }
            };

            if entry.file_type().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Check if a file has one of the configured extensions.
    pub fn matches(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.config.extensions.iter().any(|wanted| wanted == ext)
    }
}
