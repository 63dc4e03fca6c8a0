//! docsmith - documentation site maintenance utilities
//!
//! A CLI tool that generates per-service feature coverage data for the
//! LocalStack documentation, rewrites content pages and prepares and
//! verifies redirects for the site migration.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error, or failing redirect tests
//!   2 - Invalid command-line usage

mod cli;
mod config;
mod content;
mod coverage;
mod models;
mod redirects;
mod report;
mod scanner;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use cli::{Args, Command, CoverageArgs, RedirectCommand, ReplaceImagesArgs, TemplateArgs, TestArgs};
use config::{Config, CONFIG_FILE};
use content::{ImportOptions, ImportOutcome};
use coverage::CoverageOptions;
use redirects::{RedirectTester, TesterConfig, UrlSources};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if matches!(args.command, Command::InitConfig) {
        return handle_init_config();
    }

    init_logging(&args);

    info!("docsmith v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle init-config: generate a default .docsmith.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize paths, the image prefix, the staging URL, and more.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Dispatch the subcommand. Returns the exit code.
async fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    match &args.command {
        Command::Coverage(cmd) => run_coverage(cmd, &config, args.quiet),
        Command::AddImports(_) => run_add_imports(&config),
        Command::ReplaceImages(cmd) => run_replace_images(cmd, &config),
        Command::Redirects { command } => match command {
            RedirectCommand::Template(cmd) => run_redirect_template(cmd, &config).await,
            RedirectCommand::Test(cmd) => run_redirect_test(cmd, &config).await,
        },
        Command::InitConfig => Ok(0),
    }
}

fn run_coverage(cmd: &CoverageArgs, config: &Config, quiet: bool) -> Result<i32> {
    let start_time = Instant::now();

    let options = CoverageOptions {
        implementation_details: cmd.implementation_details.clone(),
        raw_metrics: cmd.raw_metrics.clone(),
        output_dir: cmd.output_dir.clone(),
        service_details: cmd.service_details_json.clone(),
        reset: config.coverage.reset,
        show_progress: !quiet,
    };

    println!("📥 Loading implementation tables from {}", options.implementation_details.display());
    let run = coverage::run(&options)?;

    println!("\n📊 Coverage Summary:");
    println!("   Services: {}", run.services);
    println!(
        "   Metric records: {} from {} files",
        run.metric_records, run.metric_files
    );
    println!("   Rows applied: {}", run.accepted);
    if !run.drops.is_empty() {
        let dropped: Vec<String> = run
            .drops
            .iter()
            .map(|(reason, count)| format!("{}: {}", reason, count))
            .collect();
        println!("   Skipped rows: {}", dropped.join(" | "));
    }
    if run.corrected > 0 {
        println!("   Operations corrected to implemented: {}", run.corrected);
    }
    println!("   Duration: {:.1}s", start_time.elapsed().as_secs_f64());
    println!(
        "\n✅ Wrote {} files to {}",
        run.written.len(),
        options.output_dir.join(coverage::serializer::DATA_DIR).display()
    );

    Ok(0)
}

fn run_add_imports(config: &Config) -> Result<i32> {
    let options = ImportOptions {
        dir: PathBuf::from(&config.imports.services_dir),
        extension: config.imports.extension.clone(),
        marker: config.imports.marker.clone(),
        import_line: config.imports.import_line.clone(),
    };

    if !options.dir.is_dir() {
        bail!("Directory not found: {}", options.dir.display());
    }

    let summary = content::add_imports(&options)?;
    if summary.files.is_empty() {
        println!("No .{} files found in {}", options.extension, options.dir.display());
        return Ok(0);
    }

    for (path, outcome) in &summary.files {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        match outcome {
            ImportOutcome::Added => println!("✅ Added import to {}", name),
            ImportOutcome::AlreadyPresent => println!("⏭️  Import already exists in {}", name),
            ImportOutcome::NoFrontmatter => println!("⚠️  No frontmatter found in {}", name),
        }
    }

    println!("\n📊 Summary:");
    println!("   Files processed: {}", summary.processed);
    println!("   Files skipped: {}", summary.skipped);

    Ok(0)
}

fn run_replace_images(cmd: &ReplaceImagesArgs, config: &Config) -> Result<i32> {
    let log_path = PathBuf::from(&config.images.log_path);

    let changes = content::replace_images(
        &cmd.directory,
        &config.images.extensions,
        &config.images.image_prefix,
        &log_path,
    )?;

    for change in &changes {
        debug!("{}", change.log_entry());
    }

    println!("✅ Logged {} change(s) to {}", changes.len(), log_path.display());
    Ok(0)
}

async fn run_redirect_template(cmd: &TemplateArgs, config: &Config) -> Result<i32> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.redirects.timeout_seconds))
        .user_agent(config.redirects.user_agent.clone())
        .build()
        .context("Failed to create HTTP client")?;

    let mut sources = UrlSources::new();
    let products = [
        ("aws", "🔍", "AWS", &cmd.aws_sitemap, &cmd.aws_file),
        ("snowflake", "❄️ ", "Snowflake", &cmd.snowflake_sitemap, &cmd.snowflake_file),
    ];

    for (product, icon, label, sitemap, file) in products {
        if let Some(url) = sitemap {
            println!("{} Loading {} URLs from sitemap: {}", icon, label, url);
            let urls = match redirects::fetch_sitemap(&client, url).await {
                Ok(urls) => urls,
                Err(e) => {
                    println!("❌ Error loading sitemap from {}: {:#}", url, e);
                    Vec::new()
                }
            };
            println!("   Found {} {} URLs", urls.len(), label);
            sources.extend(product, urls);
        }

        if let Some(path) = file {
            println!("📄 Loading {} URLs from file: {}", label, path.display());
            let urls = match redirects::load_urls_from_file(path) {
                Ok(urls) => urls,
                Err(e) => {
                    println!("❌ Error loading URLs from {}: {:#}", path.display(), e);
                    Vec::new()
                }
            };
            println!("   Added {} {} URLs from file", urls.len(), label);
            sources.extend(product, urls);
        }
    }

    if sources.is_empty() {
        println!("❌ No URLs found! Please provide at least one source of URLs.");
        println!("   Use --aws-sitemap, --snowflake-sitemap, --aws-file, or --snowflake-file");
        return Ok(1);
    }

    println!("\n📊 Summary:");
    println!("   AWS URLs: {}", sources.count("aws"));
    println!("   Snowflake URLs: {}", sources.count("snowflake"));
    println!("   Total: {}", sources.total());

    let output = PathBuf::from(&config.redirects.template_output);
    let template = redirects::build_template(&sources);
    redirects::write_template(&template, &output)?;

    println!("✅ Generated template config with {} URLs", sources.total());
    println!("📝 File: {}", output.display());
    println!(
        "📍 All links are paths relative to {} (no domain)",
        config.redirects.base_url
    );
    println!("\n🔧 Next steps:");
    println!("   1. Review and update the 'new_link' values in {}", output.display());
    println!("   2. Remove the '_note' fields when done");
    println!("   3. Run `docsmith redirects test` against a staging deployment");

    Ok(0)
}

async fn run_redirect_test(cmd: &TestArgs, config: &Config) -> Result<i32> {
    let redirect_config = redirects::load_redirect_config(&cmd.redirects)?;

    let tester = RedirectTester::new(TesterConfig {
        staging_url: config.redirects.staging_url.clone(),
        timeout: Duration::from_secs(config.redirects.timeout_seconds),
        delay: Duration::from_millis(config.redirects.delay_ms),
        user_agent: config.redirects.user_agent.clone(),
    })?;

    println!("🚀 Starting redirect tests...");
    println!("📍 Staging URL: {}", tester.staging_url());
    println!("⚙️  Config file: {}", cmd.redirects.display());

    let summary = tester
        .check_all(&redirect_config, |index, check| {
            if index == 1 {
                println!("\n🔍 Testing {} redirects...", check.product.to_uppercase());
            }
            println!("  [{}] Testing: {}", index, check.old_url);
            println!("      {}", check.message);
        })
        .await;

    if summary.total == 0 {
        println!("No tests found in config file!");
        return Ok(1);
    }

    println!("\n{}", "=".repeat(50));
    println!("📊 TEST RESULTS SUMMARY");
    println!("{}", "=".repeat(50));
    println!("Total tests: {}", summary.total);
    println!("Passed: {} ✅", summary.passed);
    println!("Failed: {} ❌", summary.failed);
    if let Some(rate) = summary.success_rate() {
        println!("Success rate: {:.1}%", rate);
    }

    if let Some(ref path) = cmd.report {
        report::write_report(&summary, tester.staging_url(), Utc::now(), path)?;
        println!("\n📋 Detailed report saved to: {}", path.display());
    }

    if summary.failed > 0 {
        warn!("{} redirect(s) failed", summary.failed);
        return Ok(1);
    }

    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
