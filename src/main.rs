//! Quarry main entry point
//!
//! This is the command-line interface for the Quarry site indexer.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use quarry::config::{load_config_with_hash, Config};
use quarry::output::{print_crawl_stats, print_index_stats, print_results, print_word_index};
use quarry::{Engine, QuarryError};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing_subscriber::EnvFilter;

/// Quarry: a polite single-site search indexer
///
/// Quarry crawls one website from a seed URL, builds a positional inverted
/// index of its text and answers ranked word and phrase queries against it.
#[derive(Parser, Debug)]
#[command(name = "quarry")]
#[command(version)]
#[command(about = "A polite single-site search indexer", long_about = None)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["build", "find", "print", "stats", "dry_run"]),
))]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Crawl the site from the seed URL and save the index
    #[arg(long)]
    build: bool,

    /// Load the saved index and run a ranked query
    #[arg(long, value_name = "QUERY")]
    find: Option<String>,

    /// Load the saved index and show the postings of one word
    #[arg(long, value_name = "WORD")]
    print: Option<String>,

    /// Load the saved index and show its size
    #[arg(long)]
    stats: bool,

    /// Validate the configuration and show what would be crawled
    #[arg(long)]
    dry_run: bool,

    /// Maximum number of results shown by --find
    #[arg(long, default_value_t = 10)]
    limit: usize,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("invalid configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let mut engine = Engine::new(config);

    if cli.build {
        handle_build(&mut engine).await
    } else if let Some(query) = &cli.find {
        load(&mut engine)?;
        let hits = engine.search(query)?;
        print_results(query, &hits, engine.pages(), cli.limit);
        Ok(())
    } else if let Some(word) = &cli.print {
        load(&mut engine)?;
        let word = word.to_lowercase();
        print_word_index(&word, engine.get_word_index(&word), engine.pages());
        Ok(())
    } else {
        load(&mut engine)?;
        print_index_stats(&engine.index_stats());
        Ok(())
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("quarry=info,warn"),
            1 => EnvFilter::new("quarry=debug,info"),
            2 => EnvFilter::new("quarry=trace,debug"),
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

fn load(engine: &mut Engine) -> Result<()> {
    engine
        .load_index()
        .map_err(|e| {
            tracing::error!("Failed to load index: {}", e);
            QuarryError::IndexNotLoaded
        })
        .context("no saved index found, run with --build first")
}

/// Handles --build: crawls, then saves whatever was indexed
async fn handle_build(engine: &mut Engine) -> Result<()> {
    let shutdown = engine.shutdown_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current page and saving");
            shutdown.store(true, Ordering::SeqCst);
        }
    });

    let seed = engine.config().crawler.seed().to_string();
    let stats = engine.build_index(&seed).await?;
    engine.save_index().context("failed to save index")?;

    print_crawl_stats(&stats);
    println!();
    print_index_stats(&engine.index_stats());
    Ok(())
}

/// Handles --dry-run: shows the effective configuration
fn handle_dry_run(config: &Config) {
    let crawler = &config.crawler;

    println!("=== Quarry Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Base URL: {}", crawler.base_url);
    println!("  Seed URL: {}", crawler.seed());
    println!("  Politeness delay: {}ms", crawler.politeness_delay);
    println!("  Fetch timeout: {}ms", crawler.fetch_timeout);
    match crawler.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: unlimited"),
    }
    match crawler.checkpoint_interval {
        0 => println!("  Checkpoints: off"),
        n => println!("  Checkpoints: every {} indexed pages", n),
    }
    println!("  Respect robots.txt: {}", crawler.respect_robots);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Index: {}", config.output.index_path);
    println!("  URLs: {}", config.output.urls_path);

    println!("\n✓ Configuration is valid");
}
