//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// docsmith - maintenance utilities for the LocalStack documentation site
///
/// Generates per-service feature coverage data, rewrites content pages and
/// prepares and verifies redirects for the site migration.
///
/// Examples:
///   docsmith coverage -i target/implementation -r target/metrics -o src/data/coverage
///   docsmith add-imports --dir src/content/docs/aws/services
///   docsmith replace-images src/content/docs
///   docsmith redirects template --aws-sitemap https://docs.localstack.cloud/sitemap.xml
///   docsmith redirects test --staging-url https://preview.example.com --report report.md
///   docsmith init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .docsmith.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate per-service coverage data from implementation tables and test metrics
    Coverage(CoverageArgs),

    /// Add the feature coverage import to every service page
    AddImports(AddImportsArgs),

    /// Convert figure shortcodes into Markdown images
    ReplaceImages(ReplaceImagesArgs),

    /// Generate or test site migration redirects
    Redirects {
        #[command(subcommand)]
        command: RedirectCommand,
    },

    /// Generate a default .docsmith.toml configuration file
    InitConfig,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CoverageArgs {
    /// Directory holding pro/ and community/ implementation_coverage_full.csv
    #[arg(short = 'i', long, value_name = "DIR")]
    pub implementation_details: PathBuf,

    /// Directory searched recursively for raw test metric CSVs
    #[arg(short = 'r', long, value_name = "DIR")]
    pub raw_metrics: PathBuf,

    /// Output directory; documents are written to <DIR>/data
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Service display-name lookup (accepted, not used for the output)
    #[arg(short = 's', long, value_name = "FILE")]
    pub service_details_json: Option<PathBuf>,

    /// Delete the data directory before writing
    #[arg(long)]
    pub reset: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct AddImportsArgs {
    /// Directory with the service pages
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Import statement to insert
    #[arg(long, value_name = "LINE")]
    pub import_line: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ReplaceImagesArgs {
    /// Directory searched recursively for .md/.mdx pages
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Changelog file for all replacements
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Path prefix for the rewritten image sources
    #[arg(long, value_name = "PREFIX")]
    pub image_prefix: Option<String>,
}

/// Redirect subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum RedirectCommand {
    /// Generate a redirect config template from sitemaps or URL lists
    Template(TemplateArgs),

    /// Test a redirect config against a staging deployment
    Test(TestArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct TemplateArgs {
    /// AWS sitemap URL (e.g. https://docs.localstack.cloud/sitemap.xml)
    #[arg(long, value_name = "URL")]
    pub aws_sitemap: Option<String>,

    /// Snowflake sitemap URL (e.g. https://snowflake.localstack.cloud/sitemap.xml)
    #[arg(long, value_name = "URL")]
    pub snowflake_sitemap: Option<String>,

    /// Text file with AWS URLs (one per line)
    #[arg(long, value_name = "FILE")]
    pub aws_file: Option<PathBuf>,

    /// Text file with Snowflake URLs (one per line)
    #[arg(long, value_name = "FILE")]
    pub snowflake_file: Option<PathBuf>,

    /// Base URL of the live site the new links belong to
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Output template file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct TestArgs {
    /// Redirect config JSON
    #[arg(long, value_name = "FILE", default_value = "redirects_config.json")]
    pub redirects: PathBuf,

    /// Staging deployment base URL
    #[arg(long, value_name = "URL", env = "DOCSMITH_STAGING_URL")]
    pub staging_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Pause between requests in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Save a detailed Markdown report to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match &self.command {
            Command::Redirects {
                command: RedirectCommand::Template(cmd),
            } => {
                if let Some(ref base_url) = cmd.base_url {
                    validate_http_url("Base URL", base_url)?;
                }
            }
            Command::Redirects {
                command: RedirectCommand::Test(cmd),
            } => {
                if let Some(ref url) = cmd.staging_url {
                    validate_http_url("Staging URL", url)?;
                }
                if cmd.timeout == Some(0) {
                    return Err("Timeout must be at least 1 second".to_string());
                }
            }
            Command::ReplaceImages(cmd) => {
                if !cmd.directory.is_dir() {
                    return Err(format!(
                        "Directory does not exist: {}",
                        cmd.directory.display()
                    ));
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

fn validate_http_url(name: &str, url: &str) -> Result<(), String> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(format!("{} must start with 'http://' or 'https://'", name))
    }
}
