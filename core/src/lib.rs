//! Farm Empire Core Library
//!
//! Shared domain records for the farm economy: accounts and their two
//! currencies, owned farms and collectibles, auction lots, trades and
//! server-wide buffs, plus the typed catalog registry, configuration,
//! clock and error taxonomy used by every other crate.

pub mod account;
pub mod asset;
pub mod buff;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod lot;
pub mod trade;

pub use account::{Account, AccountId, Currency, DisplayId, Holdings};
pub use asset::{Farm, FarmId, Nft, NftId, UpgradeKind};
pub use buff::GlobalBuff;
pub use catalog::{
    CaseEntry, CaseReward, Catalog, ExchangePack, FarmEntry, FarmKind, NftEntry,
};
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use config::EconomyConfig;
pub use error::{EconomyError, ErrorKind, Result};
pub use lot::{AuctionLot, EscrowedAsset, LotId, LotKind, LotStatus};
pub use trade::{FarmTrade, TradeId, TradeStatus};

/// Economic constants
pub mod constants {
    /// Seconds in one hour
    pub const SECS_PER_HOUR: i64 = 3_600;

    /// Lowest upgrade level of a farm
    pub const MIN_UPGRADE_LEVEL: u8 = 1;

    /// Highest upgrade level of a farm
    pub const MAX_UPGRADE_LEVEL: u8 = 10;

    /// Highest account level reachable through experience
    pub const MAX_ACCOUNT_LEVEL: u32 = 100;
}
