//! Redirect config template generation.
//!
//! Turns lists of old-site URLs into a per-product JSON template that maps
//! every old path to a suggested new path for manual review.

use crate::models::{RedirectConfig, RedirectEntry};
use anyhow::{Context, Result};
use reqwest::Url;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

/// Reviewer note attached to every generated entry.
pub const REVIEW_NOTE: &str = "MANUALLY REVIEW AND UPDATE new_link";

/// Collected old-site URLs per product, deduplicated and sorted.
#[derive(Debug, Clone, Default)]
pub struct UrlSources {
    products: BTreeMap<String, BTreeSet<String>>,
}

impl UrlSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add URLs for `product`, returning how many were new.
    pub fn extend<I>(&mut self, product: &str, urls: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let set = self.products.entry(product.to_string()).or_default();
        let before = set.len();
        set.extend(urls);
        set.len() - before
    }

    /// Number of distinct URLs for `product`.
    pub fn count(&self, product: &str) -> usize {
        self.products.get(product).map_or(0, BTreeSet::len)
    }

    pub fn total(&self) -> usize {
        self.products.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Path component of `url`, falling back to the raw text (minus query and
/// fragment) when it is not an absolute URL.
pub fn url_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

/// Build the template entry for one old URL.
pub fn template_entry(product: &str, url: &str) -> RedirectEntry {
    let path = url_path(url);

    let old_link = if path.starts_with('/') {
        path.clone()
    } else {
        format!("/{}", path)
    };

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let new_link = if segments.is_empty() {
        format!("/{}/", product)
    } else {
        format!("/{}/{}", product, segments.join("/"))
    };

    RedirectEntry {
        old_link,
        new_link,
        status_code: 301,
        note: Some(REVIEW_NOTE.to_string()),
    }
}

/// Build the template; products without URLs are left out.
pub fn build_template(sources: &UrlSources) -> RedirectConfig {
    sources
        .products
        .iter()
        .filter(|(_, urls)| !urls.is_empty())
        .map(|(product, urls)| {
            let entries = urls.iter().map(|url| template_entry(product, url)).collect();
            (product.clone(), entries)
        })
        .collect()
}

/// Write the template as pretty JSON.
pub fn write_template(config: &RedirectConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config).context("Failed to serialize template")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write template to {}", path.display()))?;
    debug!("Wrote {} products to {}", config.len(), path.display());
    Ok(())
}

/// Read URLs from a text file, one per line.
///
/// Blank lines and lines starting with `#` are ignored.
pub fn load_urls_from_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read URL file {}", path.display()))?;

    Ok(content
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
