//! Auction entry points

use farm_auction::{AuctionHouse, ListingRequest, Settlement};
use farm_core::{AccountId, AuctionLot, LotId, LotKind, Result};

use crate::service::EconomyService;

impl EconomyService {
    pub fn auctions(&self) -> &AuctionHouse {
        &self.auctions
    }

    pub fn list_lot(&self, seller: AccountId, request: &ListingRequest) -> Result<AuctionLot> {
        self.auctions.create_lot(seller, request)
    }

    pub fn list_house_lot(&self, request: &ListingRequest) -> Result<AuctionLot> {
        self.auctions.create_house_lot(request)
    }

    pub fn list_active_lots(&self, kind: LotKind) -> Result<Vec<AuctionLot>> {
        self.auctions.list_active(kind)
    }

    pub fn place_bid(&self, lot_id: LotId, bidder: AccountId, amount: u64) -> Result<AuctionLot> {
        self.auctions.place_bid(lot_id, bidder, amount)
    }

    pub fn settle_lot(&self, lot_id: LotId) -> Result<Settlement> {
        self.auctions.settle(lot_id)
    }

    /// Periodic sweep: settle every lot past its expiry
    pub fn settle_expired_lots(&self) -> Result<Vec<Settlement>> {
        self.auctions.settle_expired()
    }
}
