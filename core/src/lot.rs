//! Auction lot records

use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::asset::{Farm, Nft};

pub type LotId = u64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LotKind {
    Farm,
    Nft,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LotStatus {
    Active,
    /// Terminal
    Ended,
}

/// The asset a lot holds while it is active
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EscrowedAsset {
    Farm(Farm),
    Nft(Nft),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuctionLot {
    pub id: LotId,
    pub kind: LotKind,
    /// `None` for house lots listed by an administrator
    pub seller: Option<AccountId>,
    pub asset_type: String,
    pub starting_price: u64,
    pub current_bid: u64,
    pub current_bidder: Option<AccountId>,
    pub created_at: i64,
    pub expires_at: i64,
    pub status: LotStatus,
    /// Seller's asset removed from inventory at listing time
    pub escrow: Option<EscrowedAsset>,
}

impl AuctionLot {
    pub fn is_active(&self) -> bool {
        self.status == LotStatus::Active
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    pub fn is_house_lot(&self) -> bool {
        self.seller.is_none()
    }

    /// Currency currently held by the lot on behalf of the highest bidder
    pub fn escrowed_currency(&self) -> u64 {
        if self.is_active() && self.current_bidder.is_some() {
            self.current_bid
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lot() -> AuctionLot {
        AuctionLot {
            id: 1,
            kind: LotKind::Nft,
            seller: Some(5),
            asset_type: "golden_coin".to_string(),
            starting_price: 500,
            current_bid: 500,
            current_bidder: None,
            created_at: 0,
            expires_at: 100,
            status: LotStatus::Active,
            escrow: Some(EscrowedAsset::Nft(Nft::new(3, 5, "golden_coin", 0))),
        }
    }

    #[test]
    fn test_escrowed_currency_needs_bidder() {
        let mut lot = lot();
        assert_eq!(lot.escrowed_currency(), 0);

        lot.current_bid = 600;
        lot.current_bidder = Some(8);
        assert_eq!(lot.escrowed_currency(), 600);

        lot.status = LotStatus::Ended;
        assert_eq!(lot.escrowed_currency(), 0);
    }

    #[test]
    fn test_expiry_is_inclusive() {
        let lot = lot();
        assert!(!lot.is_expired(99));
        assert!(lot.is_expired(100));
        assert!(!lot.is_house_lot());
    }
}
