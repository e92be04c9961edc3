//! Farm Empire Economy Engine
//!
//! [`EconomyService`] is the single entry point collaborators call into:
//! accounts and balances, purchases, activation and claims, upgrades, the
//! exchange shop and cases, direct trades, auctions, buffs and
//! leaderboards. Every mutating call is one storage transaction that
//! re-reads the rows it touches, validates, writes and commits.
//!
//! The service is `Send + Sync`; share it behind an `Arc`.

pub mod auctions;
pub mod buffs;
pub mod farms;
pub mod leaderboard;
pub mod service;
pub mod shop;
pub mod sweeper;
pub mod trades;

pub use farms::{ClaimReport, PurchaseReceipt};
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use service::EconomyService;
pub use shop::CaseOutcome;
pub use sweeper::AuctionSweeper;
