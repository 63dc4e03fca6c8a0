//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.docsmith.toml` files.

use crate::cli::{Args, Command, RedirectCommand};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".docsmith.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Coverage generation settings.
    #[serde(default)]
    pub coverage: CoverageConfig,

    /// Import insertion settings.
    #[serde(default)]
    pub imports: ImportsConfig,

    /// Figure rewrite settings.
    #[serde(default)]
    pub images: ImagesConfig,

    /// Redirect template and test settings.
    #[serde(default)]
    pub redirects: RedirectsConfig,
}

/// Coverage generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoverageConfig {
    /// Delete the data directory before writing.
    #[serde(default)]
    pub reset: bool,
}

/// Import insertion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportsConfig {
    /// Directory holding the service pages.
    #[serde(default = "default_services_dir")]
    pub services_dir: String,

    /// Page extension, without the dot.
    #[serde(default = "default_page_extension")]
    pub extension: String,

    /// Substring marking the import as present.
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Import statement to insert.
    #[serde(default = "default_import_line")]
    pub import_line: String,
}

impl Default for ImportsConfig {
    fn default() -> Self {
        Self {
            services_dir: default_services_dir(),
            extension: default_page_extension(),
            marker: default_marker(),
            import_line: default_import_line(),
        }
    }
}

fn default_services_dir() -> String {
    "src/content/docs/aws/services".to_string()
}

fn default_page_extension() -> String {
    "mdx".to_string()
}

fn default_marker() -> String {
    "import FeatureCoverage".to_string()
}

fn default_import_line() -> String {
    r#"import FeatureCoverage from "../../../../components/feature-coverage/FeatureCoverage";"#
        .to_string()
}

/// Figure rewrite settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Extensions of the pages to rewrite.
    #[serde(default = "default_image_extensions")]
    pub extensions: Vec<String>,

    /// Path prefix for rewritten image sources.
    #[serde(default = "default_image_prefix")]
    pub image_prefix: String,

    /// Changelog of all rewrites.
    #[serde(default = "default_log_path")]
    pub log_path: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            extensions: default_image_extensions(),
            image_prefix: default_image_prefix(),
            log_path: default_log_path(),
        }
    }
}

fn default_image_extensions() -> Vec<String> {
    vec!["md".to_string(), "mdx".to_string()]
}

fn default_image_prefix() -> String {
    "/images/aws/".to_string()
}

fn default_log_path() -> String {
    "changelog/image_changes.log".to_string()
}

/// Redirect template and test settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectsConfig {
    /// Staging deployment the redirects are checked against.
    #[serde(default = "default_staging_url")]
    pub staging_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Pause between two requests in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Base URL of the live documentation site.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Output file of `redirects template`.
    #[serde(default = "default_template_output")]
    pub template_output: String,
}

impl Default for RedirectsConfig {
    fn default() -> Self {
        Self {
            staging_url: default_staging_url(),
            timeout_seconds: default_timeout(),
            delay_ms: default_delay_ms(),
            user_agent: default_user_agent(),
            base_url: default_base_url(),
            template_output: default_template_output(),
        }
    }
}

fn default_staging_url() -> String {
    "https://a5c92421.localstack-docs.pages.dev".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_delay_ms() -> u64 {
    500
}

fn default_user_agent() -> String {
    "LocalStack-Redirect-Tester/1.0".to_string()
}

fn default_base_url() -> String {
    "https://docs.localstack.cloud".to_string()
}

fn default_template_output() -> String {
    "redirects_config_template.json".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings. Only values
    /// given explicitly on the command line override the file.
    pub fn merge_with_args(&mut self, args: &Args) {
        match &args.command {
            Command::Coverage(cmd) => {
                if cmd.reset {
                    self.coverage.reset = true;
                }
            }
            Command::AddImports(cmd) => {
                if let Some(ref dir) = cmd.dir {
                    self.imports.services_dir = dir.display().to_string();
                }
                if let Some(ref line) = cmd.import_line {
                    self.imports.import_line = line.clone();
                }
            }
            Command::ReplaceImages(cmd) => {
                if let Some(ref log) = cmd.log {
                    self.images.log_path = log.display().to_string();
                }
                if let Some(ref prefix) = cmd.image_prefix {
                    self.images.image_prefix = prefix.clone();
                }
            }
            Command::Redirects { command } => match command {
                RedirectCommand::Template(cmd) => {
                    if let Some(ref base_url) = cmd.base_url {
                        self.redirects.base_url = base_url.clone();
                    }
                    if let Some(ref output) = cmd.output {
                        self.redirects.template_output = output.display().to_string();
                    }
                }
                RedirectCommand::Test(cmd) => {
                    if let Some(ref url) = cmd.staging_url {
                        self.redirects.staging_url = url.clone();
                    }
                    if let Some(timeout) = cmd.timeout {
                        self.redirects.timeout_seconds = timeout;
                    }
                    if let Some(delay) = cmd.delay_ms {
                        self.redirects.delay_ms = delay;
                    }
                }
            },
            Command::InitConfig => {}
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
