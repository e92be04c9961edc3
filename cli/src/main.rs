//! Farm Empire daemon
//!
//! Opens the economy store, runs schema migrations and keeps settling
//! expired auction lots until interrupted.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use farm_core::{EconomyConfig, SystemClock};
use farm_engine::{AuctionSweeper, EconomyService};
use farm_storage::Store;
use owo_colors::OwoColorize;
use tokio::sync::watch;

#[derive(Parser)]
#[command(name = "farmd")]
#[command(about = "Farm Empire economy daemon", version)]
struct Cli {
    /// Path to economy configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Database directory
    #[arg(short, long, value_name = "DIR", default_value = "data/farm")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EconomyConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            log::warn!("No config file given, using built-in defaults");
            EconomyConfig::default()
        }
    };
    let sweep_every = Duration::from_secs(config.auction.sweep_interval_secs);

    let store = Store::open(&cli.data_dir)
        .with_context(|| format!("opening database {}", cli.data_dir.display()))?;

    println!("{}", "Farm Empire economy daemon".cyan().bold());
    println!("{}: {}", "Database".yellow().bold(), cli.data_dir.display());
    println!("{}: v{}", "Schema".yellow().bold(), store.schema_version()?);
    println!(
        "{}: {} farm types, {} collectibles",
        "Catalog".yellow().bold(),
        config.catalog.farms.len(),
        config.catalog.nfts.len()
    );

    let service = Arc::new(EconomyService::new(store, config, Arc::new(SystemClock)));
    let supply = service.circulating_supply()?;
    log::info!(
        "{} accounts, {} primary in circulation ({} escrowed in bids)",
        supply.accounts,
        supply.primary_balances + supply.escrowed_bids,
        supply.escrowed_bids
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = AuctionSweeper::new(service.clone(), sweep_every).spawn(shutdown_rx);

    println!("{}", "✓ Ready, press Ctrl+C to stop".green());
    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;

    log::info!("Shutting down");
    let _ = shutdown_tx.send(true);
    sweeper.await.context("auction sweeper task")?;
    service.store().flush()?;
    Ok(())
}
