// src/main.rs

//! Mixcloud show indexer CLI.
//!
//! Fetches shows from the catalog API, categorizes them with configured
//! regex rules, and maintains a local JSON index. Supports incremental
//! updates and a local-only recategorization mode.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use indexer::error::Result;
use indexer::models::Config;
use indexer::pipeline;
use indexer::services::CatalogFetcher;
use indexer::storage::IndexStore;

/// Mixcloud Show Indexer - fetch and categorize shows
#[derive(Parser, Debug)]
#[command(name = "indexer", version, about = "Mixcloud Show Indexer")]
struct Cli {
    /// Limit number of shows to fetch (for testing)
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Output JSON index path
    #[arg(short, long, default_value = "shows.json")]
    output: PathBuf,

    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Update categories locally without fetching from the API
    #[arg(long)]
    local_update: bool,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

async fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;
    let store = IndexStore::new(&cli.output);

    if cli.local_update {
        pipeline::run_recategorize(&config, &store).await?;
    } else {
        let fetcher = CatalogFetcher::new(&config.fetcher)?;
        pipeline::run_fetch(&config, &fetcher, &store, cli.limit).await?;
    }

    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("Mixcloud show indexer starting...");

    // Writes happen only after all processing, so an interrupt can never
    // leave a partial index behind; any fully-written prior index remains
    // valid and the interrupt is a normal termination.
    let result = tokio::select! {
        result = run(&cli) => result,
        _ = tokio::signal::ctrl_c() => {
            log::warn!("Interrupted by user");
            Ok(())
        }
    };

    match result {
        Ok(()) => {
            log::info!("Done!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
