//! Sitewalk main entry point
//!
//! This is the command-line interface for the Sitewalk URL discovery engine.

use anyhow::{Context, Result};
use clap::Parser;
use sitewalk::config::{load_config_with_hash, Config};
use sitewalk::output::{print_statistics, write_url_list};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Sitewalk: bounded URL discovery
///
/// Sitewalk walks a site's links breadth-first from one or more seeds,
/// up to a configured depth and URL cap, and prints every URL it visited.
#[derive(Parser, Debug)]
#[command(name = "sitewalk")]
#[command(version)]
#[command(about = "Bounded breadth-first URL discovery", long_about = None)]
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

    /// Validate config and show what would be traversed without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Write discovered URLs to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Traverse this seed instead of the seeds in the config file
    #[arg(long, value_name = "URL")]
    seed: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(seed) = cli.seed {
        config.seeds = vec![seed];
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_traversal(&config, cli.output, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the URL list.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitewalk=info,warn"),
            1 => EnvFilter::new("sitewalk=debug,info"),
            2 => EnvFilter::new("sitewalk=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    let traversal = &config.traversal;
    let fetcher = &config.fetcher;

    println!("=== Sitewalk Dry Run ===\n");

    println!("Traversal:");
    println!("  Max depth: {}", traversal.max_depth);
    println!("  Max URLs: {}", traversal.max_urls);
    println!("  Include external: {}", traversal.include_external);
    println!("  Crawl sitemap: {}", traversal.crawl_sitemap);
    println!("  Handle pagination: {}", traversal.handle_pagination);
    println!("  Concurrent requests: {}", traversal.concurrent_requests);
    println!("  Batch size: {}", traversal.batch_size);

    if !traversal.allowed_domains.is_empty() {
        println!("\nAllowed Domains ({}):", traversal.allowed_domains.len());
        for pattern in &traversal.allowed_domains {
            println!("  - {}", pattern);
        }
    }

    println!("\nFetcher:");
    println!("  Timeout: {}s", fetcher.timeout_secs);
    println!("  Connect timeout: {}s", fetcher.connect_timeout_secs);
    println!("  Max redirects: {}", fetcher.max_redirects);
    if let Some(selector) = &fetcher.next_selector {
        println!("  Next selector: {}", selector);
    }
    if let Some(proxy) = &fetcher.proxy {
        println!("  Proxy: {}", proxy);
    }
    println!("  User agents ({}):", fetcher.user_agents.len());
    for agent in &fetcher.user_agents {
        println!("    * {}", agent);
    }

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Traverses every seed and writes the combined URL list
async fn handle_traversal(config: &Config, output: Option<PathBuf>, quiet: bool) -> Result<()> {
    let cancel = CancellationToken::new();

    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight batch");
            ctrl_c_token.cancel();
        }
    });

    let mut writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    for seed in &config.seeds {
        if cancel.is_cancelled() {
            tracing::info!("Skipping remaining seeds after interrupt");
            break;
        }

        let result = sitewalk::discover(seed, &config.traversal, &config.fetcher, &cancel)
            .await
            .with_context(|| format!("Traversal from {} failed", seed))?;

        write_url_list(&result, &mut writer).context("Failed to write URL list")?;

        if !quiet {
            print_statistics(&result.stats);
        }
    }

    if let Some(path) = output {
        tracing::info!("URL list written to {}", path.display());
    }

    Ok(())
}
