//! Sitemap URL extraction.

use anyhow::{Context, Result};
use regex::Regex;
use reqwest::Client;
use tracing::debug;

const LOC_PATTERN: &str = r"(?s)<loc>\s*(.*?)\s*</loc>";

/// Every `<loc>` value of a sitemap document, in document order.
pub fn extract_locs(xml: &str) -> Result<Vec<String>> {
    let pattern = Regex::new(LOC_PATTERN).context("Invalid sitemap pattern")?;

    Ok(pattern
        .captures_iter(xml)
        .map(|caps| caps[1].to_string())
        .filter(|loc| !loc.is_empty())
        .collect())
}

/// Fetch a sitemap and return its URLs.
pub async fn fetch_sitemap(client: &Client, url: &str) -> Result<Vec<String>> {
    debug!("Fetching sitemap {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch sitemap {}", url))?
        .error_for_status()
        .with_context(|| format!("Sitemap request failed: {}", url))?;

    let body = response
        .text()
        .await
        .with_context(|| format!("Failed to read sitemap body {}", url))?;

    extract_locs(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirects::test_server::{serve, Route};

    const SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://docs.localstack.cloud/</loc></url>
  <url>
    <loc>
      https://docs.localstack.cloud/user-guide/aws/s3/
    </loc>
    <lastmod>2024-01-01</lastmod>
  </url>
  <url><loc></loc></url>
</urlset>"#;

    #[test]
    fn test_extract_locs() {
        let locs = extract_locs(SITEMAP).unwrap();
        assert_eq!(
            locs,
            vec![
                "https://docs.localstack.cloud/".to_string(),
                "https://docs.localstack.cloud/user-guide/aws/s3/".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_sitemap() {
        let base = serve(vec![Route::ok("/sitemap.xml", SITEMAP)]).await;
        let client = Client::new();

        let locs = fetch_sitemap(&client, &format!("{}/sitemap.xml", base))
            .await
            .unwrap();
        assert_eq!(locs.len(), 2);

        let missing = fetch_sitemap(&client, &format!("{}/nope.xml", base)).await;
        assert!(missing.is_err());
    }
}
