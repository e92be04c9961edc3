//! Farm Empire Auction House
//!
//! Per-lot state machine for farm and collectible auctions:
//! - Listing escrows the seller's asset inside the lot record
//! - Each accepted bid refunds the previous bidder and debits the new one
//!   in the same transaction
//! - Settlement pays the seller and delivers the asset, or returns the
//!   asset when nobody bid
//!
//! `active -> ended` is the only transition and it is terminal.

pub mod house;
pub mod settlement;

pub use house::{AuctionHouse, ListingRequest};
pub use settlement::{Settlement, SettlementOutcome};
