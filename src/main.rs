//! Site-Harvest main entry point
//!
//! This is the command-line interface for the Site-Harvest crawler and
//! content extractor. Results are printed as JSON on stdout (or written to
//! `--output`); logs and the statistics summary go to stderr.

use anyhow::Context;
use clap::{Parser, Subcommand};
use site_harvest::config::{load_config_with_hash, Config, CrawlParams};
use site_harvest::crawler::{bulk_extract, crawl};
use site_harvest::output::{print_statistics, write_json, CrawlStatistics};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Site-Harvest: a polite site crawler and content extractor
///
/// Crawls a website breadth-first from a seed URL, staying on the seed's
/// domain, and reduces every HTML page to clean text plus metadata. The
/// extract command does the same for an explicit list of URLs.
#[derive(Parser, Debug)]
#[command(name = "site-harvest")]
#[command(version)]
#[command(about = "A polite site crawler and content extractor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Write JSON results to this file instead of stdout
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,

    /// Validate config and show the effective limits without fetching anything
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site breadth-first from a seed URL
    Crawl {
        /// Seed URL; only pages on its domain (www. or not) are followed
        url: String,

        /// Maximum link depth from the seed (1-5)
        #[arg(long)]
        max_depth: Option<u32>,

        /// Maximum number of pages to extract (1-200)
        #[arg(long)]
        max_pages: Option<usize>,

        /// Requests per second across the whole crawl (0.1-10)
        #[arg(long)]
        rate_limit: Option<f64>,
    },

    /// Extract a list of URLs independently, without following links
    Extract {
        /// URLs to extract, in output order
        #[arg(required = true)]
        urls: Vec<String>,

        /// Maximum requests in flight (1-10)
        #[arg(long)]
        concurrency: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;

    match cli.command {
        Command::Crawl {
            url,
            max_depth,
            max_pages,
            rate_limit,
        } => {
            let params = crawl_params(&config, max_depth, max_pages, rate_limit);
            if cli.dry_run {
                handle_dry_run(&config, &params, None);
                return Ok(());
            }
            handle_crawl(&config, &url, params, cli.output.as_deref()).await?;
        }

        Command::Extract { urls, concurrency } => {
            let concurrency = concurrency.unwrap_or(config.extract.concurrency);
            if cli.dry_run {
                handle_dry_run(&config, &CrawlParams::from(&config.crawler), Some(concurrency));
                return Ok(());
            }
            handle_extract(&config, urls, concurrency, cli.output.as_deref()).await?;
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries nothing but the JSON result.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_harvest=info,warn"),
            1 => EnvFilter::new("site_harvest=debug,info"),
            2 => EnvFilter::new("site_harvest=trace,debug"),
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

/// Loads the configuration file, or the defaults when none is given
fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Crawl limits from the config, overridden by any command-line flags
fn crawl_params(
    config: &Config,
    max_depth: Option<u32>,
    max_pages: Option<usize>,
    rate_limit: Option<f64>,
) -> CrawlParams {
    let defaults = CrawlParams::from(&config.crawler);
    CrawlParams {
        max_depth: max_depth.unwrap_or(defaults.max_depth),
        max_pages: max_pages.unwrap_or(defaults.max_pages),
        rate_limit: rate_limit.unwrap_or(defaults.rate_limit),
    }
}

/// Handles the --dry-run mode: shows the effective settings and exits
fn handle_dry_run(config: &Config, params: &CrawlParams, concurrency: Option<usize>) {
    let effective = params.clamped();

    eprintln!("=== Site-Harvest Dry Run ===\n");

    eprintln!("Crawl Limits (after clamping):");
    eprintln!("  Max depth: {}", effective.max_depth);
    eprintln!("  Max pages: {}", effective.max_pages);
    eprintln!("  Rate limit: {:.1} req/s", effective.rate_limit);
    eprintln!(
        "  Retries: {} (backoff {}ms x attempt)",
        config.crawler.max_retries, config.crawler.retry_backoff_ms
    );

    eprintln!("\nHTTP:");
    eprintln!("  Timeout: {}s", config.http.timeout_secs);
    eprintln!("  Max redirects: {}", config.http.max_redirects);
    eprintln!("  Accept-Language: {}", config.http.accept_language);
    eprintln!("  User-Agent: {}", config.user_agent.header_value());

    if let Some(concurrency) = concurrency {
        eprintln!("\nExtract:");
        eprintln!(
            "  Concurrency: {}",
            site_harvest::config::clamp_concurrency(concurrency)
        );
        eprintln!("  Max URLs: {}", config.extract.max_urls);
    }

    eprintln!("\nDry run complete. Remove --dry-run to start.");
}

/// Handles the crawl command
async fn handle_crawl(
    config: &Config,
    url: &str,
    params: CrawlParams,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let outcome = crawl(config, url, params)
        .await
        .context("Failed to start crawl")?;

    write_json(&outcome, output).context("Failed to write crawl results")?;
    print_statistics(&CrawlStatistics::from_crawl(&outcome));

    Ok(())
}

/// Handles the extract command
async fn handle_extract(
    config: &Config,
    mut urls: Vec<String>,
    concurrency: usize,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    if urls.len() > config.extract.max_urls {
        tracing::warn!(
            "Got {} URLs, only the first {} will be extracted",
            urls.len(),
            config.extract.max_urls
        );
        urls.truncate(config.extract.max_urls);
    }

    let outcomes = bulk_extract(config, &urls, concurrency)
        .await
        .context("Failed to start extraction")?;

    write_json(&outcomes, output).context("Failed to write extraction results")?;
    print_statistics(&CrawlStatistics::from_extract(&outcomes));

    Ok(())
}
