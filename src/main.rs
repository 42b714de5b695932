//! Cache-Warmer main entry point
//!
//! This is the command-line interface for the Cache-Warmer sitemap crawler.

use cache_warmer::config::{read_config_with_hash, validate, Config, OutputFormat};
use cache_warmer::crawler::{warmup, Coordinator};
use cache_warmer::output::{write_report, WarmupSummary};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Cache-Warmer: warm HTTP caches from XML sitemaps
///
/// Cache-Warmer resolves sitemaps (and the sitemap indexes they reference),
/// orders the discovered URLs and requests each of them with bounded
/// concurrency so that downstream caches get populated.
#[derive(Parser, Debug)]
#[command(name = "cache-warmer")]
#[command(version)]
#[command(about = "Warm HTTP caches from XML sitemaps", long_about = None)]
struct Cli {
    /// Sitemap URLs or local sitemap files
    #[arg(value_name = "SITEMAP")]
    sitemaps: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Additional URL to warm directly (repeatable)
    #[arg(short, long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// Exclude pattern, a glob or a #regex# (repeatable)
    #[arg(short, long, value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Maximum number of URLs to warm, 0 for unbounded
    #[arg(short, long)]
    limit: Option<usize>,

    /// Crawling strategy (sort-by-priority, sort-by-lastmod, sort-by-changefreq)
    #[arg(short, long)]
    strategy: Option<String>,

    /// Maximum number of concurrent requests
    #[arg(long)]
    concurrency: Option<usize>,

    /// HTTP method used for warmup requests
    #[arg(long, value_name = "METHOD")]
    request_method: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Abort on the first sitemap error
    #[arg(long)]
    strict: bool,

    /// Stop sending new requests after the first failed one
    #[arg(long)]
    stop_on_failure: bool,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Resolve sitemaps and list the URLs that would be warmed, without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = match load_merged_config(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config).await
    } else {
        handle_warmup(&config, config_hash).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so that reports on stdout stay machine readable.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("cache_warmer=info,warn"),
            1 => EnvFilter::new("cache_warmer=debug,info"),
            2 => EnvFilter::new("cache_warmer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies command line overrides and validates
fn load_merged_config(cli: &Cli) -> Result<(Config, Option<String>), Box<dyn std::error::Error>> {
    let (mut config, hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = read_config_with_hash(path)?;
            tracing::debug!("Configuration hash: {}", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    apply_overrides(&mut config, cli);
    validate(&config)?;

    Ok((config, hash))
}

/// Command line values take precedence over the config file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    config.sitemaps.extend(cli.sitemaps.iter().cloned());
    config.urls.extend(cli.urls.iter().cloned());
    config.exclude.extend(cli.exclude.iter().cloned());

    if let Some(limit) = cli.limit {
        config.limit = limit;
    }
    if let Some(strategy) = &cli.strategy {
        config.strategy = Some(strategy.clone());
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if let Some(method) = &cli.request_method {
        config.crawler.request_method = method.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.timeout = timeout;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    config.strict |= cli.strict;
    config.stop_on_failure |= cli.stop_on_failure;
}

/// Resolves seeds into a coordinator without crawling
async fn collect(config: &Config) -> Result<Coordinator, Box<dyn std::error::Error>> {
    let mut coordinator = Coordinator::from_config(config)?;

    if !config.sitemaps.is_empty() {
        tracing::info!("Resolving {} sitemaps", config.sitemaps.len());
        coordinator.add_sitemap_locations(&config.sitemaps).await?;
    }
    for url in &config.urls {
        coordinator.add_url_str(url)?;
    }

    Ok(coordinator)
}

/// Handles the --dry-run mode: shows the URLs that would be warmed
async fn handle_dry_run(config: &Config) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let coordinator = collect(config).await?;
    let urls = coordinator
        .strategy()
        .apply(coordinator.accepted_urls().to_vec());

    println!("=== Cache-Warmer Dry Run ===\n");
    println!("Strategy: {}", coordinator.strategy());
    println!("Concurrency: {}", config.crawler.concurrency);
    println!(
        "Sitemaps: {} accepted, {} excluded, {} failed",
        coordinator.accepted_sitemaps().len(),
        coordinator.excluded_sitemaps().len(),
        coordinator.failed_sitemaps().len()
    );
    println!("\nUrls ({}):", urls.len());
    for url in &urls {
        println!("  - {}", url);
    }

    if coordinator.failed_sitemaps().is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Handles the main warmup operation
async fn handle_warmup(
    config: &Config,
    config_hash: Option<String>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let started_at = Utc::now();

    let (coordinator, result) = match warmup(config).await {
        Ok(done) => done,
        Err(e) => {
            tracing::error!("Warmup failed: {}", e);
            return Err(e.into());
        }
    };

    let summary = WarmupSummary::new(coordinator.collector(), &result)
        .with_timing(started_at, Utc::now())
        .with_config_hash(config_hash);

    write_report(&mut std::io::stdout().lock(), config.format, &summary, &result)?;

    if summary.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
