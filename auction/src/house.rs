//! Auction house service

use std::sync::Arc;

use farm_core::{
    AccountId, AuctionLot, Currency, EconomyConfig, EconomyError, EscrowedAsset, LotId, LotKind,
    LotStatus, Result, SharedClock,
};
use farm_core::constants::SECS_PER_HOUR;
use farm_economics::PriceCalculator;
use farm_storage::{abort, Store, TxResult, Txn};
use serde::{Deserialize, Serialize};

use crate::settlement::{settle_lot, Settlement, SettlementOutcome};

/// What a seller (or an administrator) puts up for auction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRequest {
    pub kind: LotKind,
    pub asset_type: String,
    pub starting_price: u64,
    /// Falls back to the configured default duration
    pub duration_hours: Option<u64>,
}

enum BidResult {
    Accepted(AuctionLot),
    Expired(Settlement),
}

#[derive(Clone)]
pub struct AuctionHouse {
    store: Store,
    config: Arc<EconomyConfig>,
    clock: SharedClock,
}

impl AuctionHouse {
    pub fn new(store: Store, config: Arc<EconomyConfig>, clock: SharedClock) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    fn duration_secs(&self, requested: Option<u64>) -> Result<i64> {
        let hours = requested.unwrap_or(self.config.auction.default_duration_hours);
        if hours == 0 || hours > self.config.auction.max_duration_hours {
            return Err(EconomyError::validation(format!(
                "auction duration must be between 1 and {} hours",
                self.config.auction.max_duration_hours
            )));
        }
        Ok(hours as i64 * SECS_PER_HOUR)
    }

    fn catalog_price(&self, kind: LotKind, asset_type: &str) -> Result<u64> {
        match kind {
            LotKind::Farm => Ok(self.config.catalog.farm(asset_type)?.price),
            LotKind::Nft => Ok(self.config.catalog.nft(asset_type)?.price),
        }
    }

    /// List one of the seller's assets. The lowest-id asset of the
    /// requested type leaves the seller's inventory and is held by the lot.
    pub fn create_lot(&self, seller: AccountId, request: &ListingRequest) -> Result<AuctionLot> {
        let catalog_price = self.catalog_price(request.kind, &request.asset_type)?;
        let max_start =
            PriceCalculator::max_starting_price(catalog_price, self.config.auction.start_price_divisor);
        if request.starting_price == 0 || request.starting_price > max_start {
            return Err(EconomyError::validation(format!(
                "starting price must be between 1 and {}",
                max_start
            )));
        }
        let duration = self.duration_secs(request.duration_hours)?;
        let now = self.clock.now();

        let lot = self.store.transact(|tx| {
            tx.account(seller)?;
            let escrow = take_lowest(tx, seller, request)?;
            let lot = AuctionLot {
                id: tx.next_id("lot")?,
                kind: request.kind,
                seller: Some(seller),
                asset_type: request.asset_type.clone(),
                starting_price: request.starting_price,
                current_bid: request.starting_price,
                current_bidder: None,
                created_at: now,
                expires_at: now + duration,
                status: LotStatus::Active,
                escrow: Some(escrow),
            };
            tx.put_lot(&lot)?;
            Ok(lot)
        })?;

        log::info!(
            "Lot {} created: {} '{}' by account {} from {} until {}",
            lot.id,
            kind_name(lot.kind),
            lot.asset_type,
            seller,
            lot.starting_price,
            lot.expires_at
        );
        Ok(lot)
    }

    /// List an asset with no seller; it is minted for the winner.
    /// Collectibles that have reached their mint cap cannot be listed.
    pub fn create_house_lot(&self, request: &ListingRequest) -> Result<AuctionLot> {
        self.catalog_price(request.kind, &request.asset_type)?;
        if request.starting_price == 0 {
            return Err(EconomyError::validation("starting price must be positive"));
        }
        let mint_cap = match request.kind {
            LotKind::Nft => self.config.catalog.nft(&request.asset_type)?.mint_cap,
            LotKind::Farm => None,
        };
        let duration = self.duration_secs(request.duration_hours)?;
        let now = self.clock.now();

        let lot = self.store.transact(|tx| {
            if let Some(cap) = mint_cap {
                let minted = tx.minted(&request.asset_type)?;
                if minted >= cap {
                    return abort(EconomyError::invalid_state(format!(
                        "{} is sold out ({} of {} minted)",
                        request.asset_type, minted, cap
                    )));
                }
            }
            let lot = AuctionLot {
                id: tx.next_id("lot")?,
                kind: request.kind,
                seller: None,
                asset_type: request.asset_type.clone(),
                starting_price: request.starting_price,
                current_bid: request.starting_price,
                current_bidder: None,
                created_at: now,
                expires_at: now + duration,
                status: LotStatus::Active,
                escrow: None,
            };
            tx.put_lot(&lot)?;
            Ok(lot)
        })?;

        log::info!(
            "House lot {} created: {} '{}' from {}",
            lot.id,
            kind_name(lot.kind),
            lot.asset_type,
            lot.starting_price
        );
        Ok(lot)
    }

    /// Place a bid. A bid on a lot past its expiry settles the lot and is
    /// rejected with `AuctionExpired`. The current top bidder may raise
    /// their own bid; their escrowed bid counts toward the new amount.
    pub fn place_bid(&self, lot_id: LotId, bidder: AccountId, amount: u64) -> Result<AuctionLot> {
        let now = self.clock.now();

        let result = self.store.transact(|tx| {
            let mut lot = match tx.find_lot(lot_id)? {
                Some(lot) if lot.is_active() => lot,
                _ => return abort(EconomyError::AuctionNotFound(lot_id)),
            };
            if lot.is_expired(now) {
                let settlement = settle_lot(tx, &self.config.catalog, lot, now)?;
                return Ok(BidResult::Expired(settlement));
            }
            if amount <= lot.current_bid {
                return abort(EconomyError::BidTooLow {
                    current: lot.current_bid,
                });
            }
            if lot.seller == Some(bidder) {
                return abort(EconomyError::SelfBid);
            }
            // A top bidder raising their own bid only needs the increment
            let refund = if lot.current_bidder == Some(bidder) {
                lot.current_bid
            } else {
                0
            };
            let available = tx.account(bidder)?.primary.saturating_add(refund);
            if available < amount {
                return abort(EconomyError::InsufficientFunds {
                    currency: Currency::Primary,
                    required: amount,
                    available,
                });
            }

            if let Some(previous) = lot.current_bidder {
                tx.credit(previous, Currency::Primary, lot.current_bid)?;
            }
            tx.debit(bidder, Currency::Primary, amount)?;

            lot.current_bid = amount;
            lot.current_bidder = Some(bidder);
            tx.put_lot(&lot)?;
            Ok(BidResult::Accepted(lot))
        })?;

        match result {
            BidResult::Accepted(lot) => {
                log::debug!("Lot {}: account {} bid {}", lot_id, bidder, amount);
                Ok(lot)
            }
            BidResult::Expired(settlement) => {
                log_settlement(&settlement);
                Err(EconomyError::AuctionExpired(lot_id))
            }
        }
    }

    /// End a lot now, whether or not it has reached its expiry
    pub fn settle(&self, lot_id: LotId) -> Result<Settlement> {
        let now = self.clock.now();
        let settlement = self.store.transact(|tx| match tx.find_lot(lot_id)? {
            Some(lot) => settle_lot(tx, &self.config.catalog, lot, now),
            None => abort(EconomyError::AuctionNotFound(lot_id)),
        })?;
        log_settlement(&settlement);
        Ok(settlement)
    }

    /// Settle every active lot whose expiry has passed. Lots that fail to
    /// settle are logged and left for the next sweep.
    pub fn settle_expired(&self) -> Result<Vec<Settlement>> {
        let now = self.clock.now();
        let due: Vec<LotId> = self
            .store
            .lots()?
            .into_iter()
            .filter(|lot| lot.is_active() && lot.is_expired(now))
            .map(|lot| lot.id)
            .collect();

        let mut settled = Vec::with_capacity(due.len());
        for lot_id in due {
            let result = self.store.transact(|tx| match tx.find_lot(lot_id)? {
                Some(lot) if lot.is_active() && lot.is_expired(now) => {
                    Ok(Some(settle_lot(tx, &self.config.catalog, lot, now)?))
                }
                _ => Ok(None),
            });
            match result {
                Ok(Some(settlement)) => {
                    log_settlement(&settlement);
                    settled.push(settlement);
                }
                Ok(None) => {}
                Err(e) if e.is_recoverable() => {
                    log::error!("Failed to settle lot {}: {}", lot_id, e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(settled)
    }

    /// Unexpired active lots of one kind, soonest expiry first
    pub fn list_active(&self, kind: LotKind) -> Result<Vec<AuctionLot>> {
        let now = self.clock.now();
        let mut lots: Vec<AuctionLot> = self
            .store
            .lots()?
            .into_iter()
            .filter(|lot| lot.kind == kind && lot.is_active() && !lot.is_expired(now))
            .collect();
        lots.sort_by_key(|lot| (lot.expires_at, lot.id));
        Ok(lots)
    }

    pub fn lot(&self, lot_id: LotId) -> Result<AuctionLot> {
        self.store
            .lot(lot_id)?
            .ok_or(EconomyError::AuctionNotFound(lot_id))
    }
}

/// Remove the seller's lowest-id asset of the requested type
fn take_lowest(tx: &Txn<'_>, seller: AccountId, request: &ListingRequest) -> TxResult<EscrowedAsset> {
    let missing = || {
        EconomyError::invalid_state(format!(
            "account {} owns no {} of type '{}'",
            seller,
            kind_name(request.kind),
            request.asset_type
        ))
    };
    match request.kind {
        LotKind::Farm => {
            let lowest = tx
                .farms_of(seller)?
                .into_iter()
                .filter(|farm| farm.farm_type == request.asset_type)
                .map(|farm| farm.id)
                .min();
            match lowest {
                Some(id) => Ok(EscrowedAsset::Farm(tx.remove_farm(id, seller)?)),
                None => abort(missing()),
            }
        }
        LotKind::Nft => {
            let lowest = tx
                .nfts_of(seller)?
                .into_iter()
                .filter(|nft| nft.nft_type == request.asset_type)
                .map(|nft| nft.id)
                .min();
            match lowest {
                Some(id) => Ok(EscrowedAsset::Nft(tx.remove_nft(id, seller)?)),
                None => abort(missing()),
            }
        }
    }
}

fn kind_name(kind: LotKind) -> &'static str {
    match kind {
        LotKind::Farm => "farm",
        LotKind::Nft => "collectible",
    }
}

fn log_settlement(settlement: &Settlement) {
    match &settlement.outcome {
        SettlementOutcome::Sold { winner, price, .. } => log::info!(
            "Lot {} sold: '{}' to account {} for {}",
            settlement.lot_id,
            settlement.asset_type,
            winner,
            price
        ),
        SettlementOutcome::Returned { seller } => log::info!(
            "Lot {} ended without bids, '{}' returned to account {}",
            settlement.lot_id,
            settlement.asset_type,
            seller
        ),
        SettlementOutcome::Unsold => log::info!(
            "House lot {} ended without bids",
            settlement.lot_id
        ),
    }
}
