//! Product-Scout main entry point
//!
//! This is the command-line interface for the Product-Scout product page discoverer.

use anyhow::Context;
use clap::Parser;
use product_scout::config::{load_config_with_hash, Config};
use product_scout::crawler::{crawl, RetryPolicy};
use product_scout::output::print_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Product-Scout: an e-commerce product page discoverer
///
/// Product-Scout crawls shop domains from their home page, follows
/// pagination controls, and writes every product page URL it finds to a
/// timestamped results file.
#[derive(Parser, Debug)]
#[command(name = "product-scout")]
#[command(version)]
#[command(about = "An e-commerce product page discoverer", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, &config_hash, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("product_scout=info,warn"),
            1 => EnvFilter::new("product_scout=debug,info"),
            2 => EnvFilter::new("product_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Product-Scout Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Page budget per domain: {}", config.crawler.max_pages_per_domain);
    println!("  Concurrent domains: {}", config.crawler.concurrent_requests);
    println!(
        "  Concurrent pages per domain: {}",
        config.crawler.max_concurrent_requests_pages
    );
    println!(
        "  Attempts per page: {} (backoff from {}ms)",
        config.crawler.max_attempts, config.crawler.retry_base_delay_ms
    );
    println!(
        "  Worst-case backoff per page: {:?}",
        RetryPolicy::from_config(&config.crawler).total_delay()
    );
    println!(
        "  Navigation timeout: {}s",
        config.crawler.navigation_timeout_secs
    );
    println!(
        "  Max pagination steps: {}",
        config.crawler.max_pagination_steps
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Directory: {}", config.output.output_dir);

    println!("\nDomains ({}):", config.domains.len());
    for domain in &config.domains {
        println!("  - https://{}/", domain);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would visit at most {} pages",
        config.domains.len() as u64 * u64::from(config.crawler.max_pages_per_domain)
    );
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: &str, quiet: bool) -> anyhow::Result<()> {
    tracing::info!(
        "Domains: {}, page budget: {}",
        config.domains.len(),
        config.crawler.max_pages_per_domain
    );

    let summary = match crawl(config, config_hash).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e).context("crawl failed");
        }
    };

    if !quiet {
        print_summary(&summary);
    }

    Ok(())
}
