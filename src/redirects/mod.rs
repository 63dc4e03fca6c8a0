//! Site migration redirects.
//!
//! Generates redirect config templates from old-site URLs and verifies a
//! finished config against a staging deployment.

pub mod sitemap;
pub mod template;
pub mod tester;

pub use sitemap::fetch_sitemap;
pub use template::{build_template, load_urls_from_file, write_template, UrlSources};
pub use tester::{load_redirect_config, RedirectTester, TesterConfig};
