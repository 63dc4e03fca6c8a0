//! Redirect verification against a staging deployment.

use crate::models::{RedirectCheck, RedirectConfig, RedirectEntry, RedirectSummary};
use anyhow::{Context, Result};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Settings for a [`RedirectTester`].
#[derive(Debug, Clone)]
pub struct TesterConfig {
    pub staging_url: String,
    pub timeout: Duration,
    /// Pause after every request.
    pub delay: Duration,
    pub user_agent: String,
}

/// Sequential redirect checker.
pub struct RedirectTester {
    client: Client,
    staging_url: String,
    delay: Duration,
}

impl RedirectTester {
    pub fn new(config: TesterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            staging_url: config.staging_url.trim_end_matches('/').to_string(),
            delay: config.delay,
        })
    }

    /// Staging base URL without trailing slash.
    pub fn staging_url(&self) -> &str {
        &self.staging_url
    }

    /// Request `old_link` on staging and compare where it lands.
    pub async fn check(&self, product: &str, entry: &RedirectEntry) -> RedirectCheck {
        let url = format!("{}{}", self.staging_url, entry.old_link);
        let expected = format!("{}{}", self.staging_url, entry.new_link);

        let mut check = RedirectCheck {
            product: product.to_string(),
            old_url: entry.old_link.clone(),
            expected_new_url: entry.new_link.clone(),
            final_url: String::new(),
            status_code: 0,
            success: false,
            message: String::new(),
        };

        match self.client.get(&url).send().await {
            Ok(response) => {
                check.final_url = response.url().to_string();
                check.status_code = response.status().as_u16();
                if check.final_url == expected {
                    check.success = true;
                    check.message = "✅ Redirect successful".to_string();
                } else {
                    check.message = format!("❌ Expected: {}, Got: {}", expected, check.final_url);
                }
            }
            Err(e) if e.is_timeout() => {
                check.message = "⏰ Request timeout".to_string();
            }
            Err(e) => {
                check.message = format!("🔌 Request failed: {}", e);
            }
        }

        debug!("{} -> {} ({})", url, check.final_url, check.status_code);
        check
    }

    /// Check every entry, products in key order.
    ///
    /// `on_check` is called after each request with the product's 1-based
    /// entry index and the outcome.
    pub async fn check_all<F>(&self, config: &RedirectConfig, mut on_check: F) -> RedirectSummary
    where
        F: FnMut(usize, &RedirectCheck),
    {
        let mut summary = RedirectSummary::default();

        for (product, entries) in config {
            for (i, entry) in entries.iter().enumerate() {
                let check = self.check(product, entry).await;
                on_check(i + 1, &check);
                summary.record(check);

                if !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }
            }
        }

        summary
    }
}

/// Load a redirect config file.
pub fn load_redirect_config(path: &Path) -> Result<RedirectConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Config file '{}' not found", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse redirect config {}", path.display()))
}
