//! Farm Empire admin tool - inspect and adjust the economy store
//!
//! Opens the database directly, so it cannot run while `farmd` holds it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use farm_auction::{ListingRequest, SettlementOutcome};
use farm_core::{AuctionLot, Currency, EconomyConfig, LotKind, SystemClock};
use farm_engine::{EconomyService, Leaderboard};
use farm_storage::Store;
use owo_colors::OwoColorize;

#[derive(Parser)]
#[command(name = "farm-admin")]
#[command(about = "Farm Empire economy admin tool", version)]
struct Cli {
    /// Path to economy configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Database directory
    #[arg(short, long, value_name = "DIR", default_value = "data/farm")]
    data_dir: PathBuf,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum CurrencyArg {
    Primary,
    Secondary,
}

impl From<CurrencyArg> for Currency {
    fn from(arg: CurrencyArg) -> Self {
        match arg {
            CurrencyArg::Primary => Currency::Primary,
            CurrencyArg::Secondary => Currency::Secondary,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Farm,
    Nft,
}

impl From<KindArg> for LotKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Farm => LotKind::Farm,
            KindArg::Nft => LotKind::Nft,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum BoardArg {
    Primary,
    Secondary,
    Income,
    Collectibles,
}

impl From<BoardArg> for Leaderboard {
    fn from(arg: BoardArg) -> Self {
        match arg {
            BoardArg::Primary => Leaderboard::Balance(Currency::Primary),
            BoardArg::Secondary => Leaderboard::Balance(Currency::Secondary),
            BoardArg::Income => Leaderboard::Income,
            BoardArg::Collectibles => Leaderboard::Collectibles,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show an account's balances and holdings
    Balance {
        account: u64,
        /// Treat the argument as a display id
        #[arg(long)]
        display: bool,
    },

    /// Credit currency to an account
    Credit {
        account: u64,
        amount: u64,
        #[arg(long, value_enum, default_value = "primary")]
        currency: CurrencyArg,
    },

    /// Debit currency from an account
    Debit {
        account: u64,
        amount: u64,
        #[arg(long, value_enum, default_value = "primary")]
        currency: CurrencyArg,
    },

    /// Give an account a farm
    GrantFarm { account: u64, farm_type: String },

    /// Give an account a collectible
    GrantNft { account: u64, nft_type: String },

    /// List active auction lots
    Lots {
        #[arg(long, value_enum, default_value = "farm")]
        kind: KindArg,
    },

    /// Put a house lot up for auction; the asset is minted for the winner
    HouseLot {
        #[arg(value_enum)]
        kind: KindArg,
        asset_type: String,
        starting_price: u64,
        #[arg(long)]
        hours: Option<u64>,
    },

    /// Settle one lot, or every expired lot when no id is given
    Settle { lot: Option<u64> },

    /// Show a leaderboard
    Top {
        #[arg(value_enum, default_value = "primary")]
        board: BoardArg,
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Start a global yield buff
    Buff { multiplier: f64, hours: f64 },

    /// Show circulating supply
    Supply,
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_time(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

fn print_lot(lot: &AuctionLot) {
    let bidder = match lot.current_bidder {
        Some(id) => id.to_string(),
        None => "-".to_string(),
    };
    let seller = match lot.seller {
        Some(id) => id.to_string(),
        None => "house".to_string(),
    };
    println!(
        "  #{:<6} {:<16} bid {:>10} by {:<12} seller {:<12} ends {}",
        lot.id,
        lot.asset_type,
        lot.current_bid.to_string().green(),
        bidder,
        seller,
        format_time(lot.expires_at)
    );
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EconomyConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EconomyConfig::default(),
    };
    let store = Store::open(&cli.data_dir)
        .with_context(|| format!("opening database {}", cli.data_dir.display()))?;
    let service = EconomyService::new(store, config, Arc::new(SystemClock));

    match cli.command {
        Commands::Balance { account, display } => {
            let account = if display {
                service.account_by_display_id(account)?
            } else {
                service.account(account)?
            };
            let farms = service.list_farms(account.id)?;
            let nfts = service.list_collectibles(account.id)?;

            println!("\n{} {} (#{})", "Account".cyan().bold(), account.id, account.display_id);
            println!("═══════════════════════════════════");
            println!("Primary:       {}", account.primary.to_string().green());
            println!("Secondary:     {}", account.secondary.to_string().green());
            println!("Level:         {} ({} xp)", account.level, account.experience);
            println!("Last claim:    {}", format_time(account.last_claim));
            println!("Boost:         x{:.3}", service.boost(account.id)?);
            println!("Hourly income: {}", service.hourly_income(account.id)?);
            println!("\nFarms ({})", farms.len());
            for farm in &farms {
                let state = if farm.active { "active" } else { "idle" };
                println!(
                    "  #{:<6} {:<12} speed {:>2} capacity {:>2} {}",
                    farm.id, farm.farm_type, farm.speed_level, farm.capacity_level, state
                );
            }
            println!("\nCollectibles ({})", nfts.len());
            for nft in &nfts {
                println!("  #{:<6} {}", nft.id, nft.nft_type);
            }
            println!();
        }

        Commands::Credit {
            account,
            amount,
            currency,
        } => {
            let balance = service.credit_admin(account, currency.into(), amount)?;
            println!("{} new balance {}", "✓".green(), balance);
        }

        Commands::Debit {
            account,
            amount,
            currency,
        } => {
            let balance = service.debit_admin(account, currency.into(), amount)?;
            println!("{} new balance {}", "✓".green(), balance);
        }

        Commands::GrantFarm { account, farm_type } => {
            let farm = service.grant_farm(account, &farm_type)?;
            println!("{} farm #{} granted to {}", "✓".green(), farm.id, account);
        }

        Commands::GrantNft { account, nft_type } => {
            let nft = service.grant_nft(account, &nft_type)?;
            println!("{} collectible #{} granted to {}", "✓".green(), nft.id, account);
        }

        Commands::Lots { kind } => {
            let lots = service.list_active_lots(kind.into())?;
            if cli.json {
                return print_json(&lots);
            }
            println!("\n{} ({})", "Active lots".cyan().bold(), lots.len());
            for lot in &lots {
                print_lot(lot);
            }
            println!();
        }

        Commands::HouseLot {
            kind,
            asset_type,
            starting_price,
            hours,
        } => {
            let lot = service.list_house_lot(&ListingRequest {
                kind: kind.into(),
                asset_type,
                starting_price,
                duration_hours: hours,
            })?;
            println!("{} house lot created", "✓".green());
            print_lot(&lot);
        }

        Commands::Settle { lot } => {
            let settled = match lot {
                Some(id) => vec![service.settle_lot(id)?],
                None => service.settle_expired_lots()?,
            };
            for settlement in &settled {
                match &settlement.outcome {
                    SettlementOutcome::Sold { winner, price, .. } => println!(
                        "  #{} {} sold to {} for {}",
                        settlement.lot_id,
                        settlement.asset_type,
                        winner,
                        price.to_string().green()
                    ),
                    SettlementOutcome::Returned { seller } => println!(
                        "  #{} {} returned to {}",
                        settlement.lot_id, settlement.asset_type, seller
                    ),
                    SettlementOutcome::Unsold => println!(
                        "  #{} {} unsold",
                        settlement.lot_id, settlement.asset_type
                    ),
                }
            }
            println!("{} {} lot(s) settled", "✓".green(), settled.len());
        }

        Commands::Top { board, limit } => {
            let entries = service.leaderboard(board.into(), limit)?;
            if cli.json {
                return print_json(&entries);
            }
            println!("\n{}", "Leaderboard".cyan().bold());
            println!("═══════════════════════════════════");
            for (rank, entry) in entries.iter().enumerate() {
                println!(
                    "  {:>3}. #{:<8} {:>14}",
                    rank + 1,
                    entry.display_id,
                    entry.value.to_string().green()
                );
            }
            println!();
        }

        Commands::Buff { multiplier, hours } => {
            let buff = service.start_global_buff(multiplier, hours)?;
            println!(
                "{} buff x{} active until {}",
                "✓".green(),
                buff.multiplier,
                format_time(buff.ends_at)
            );
        }

        Commands::Supply => {
            let supply = service.circulating_supply()?;
            if cli.json {
                return print_json(&supply);
            }
            println!("\n{}", "Circulating supply".cyan().bold());
            println!("═══════════════════════════════════");
            println!("Accounts:        {}", supply.accounts);
            println!("Primary:         {}", supply.circulating(Currency::Primary));
            println!("  in balances:   {}", supply.primary_balances);
            println!("  escrowed bids: {}", supply.escrowed_bids);
            println!("Secondary:       {}", supply.circulating(Currency::Secondary));
            println!();
        }
    }

    Ok(())
}
