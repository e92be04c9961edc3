//! Lot settlement

use farm_core::{
    AccountId, AuctionLot, Catalog, Currency, EconomyError, EscrowedAsset, LotId, LotKind,
    LotStatus,
};
use farm_storage::{abort, TxResult, Txn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettlementOutcome {
    /// Highest bidder received the asset; the seller (if any) was paid
    Sold {
        winner: AccountId,
        price: u64,
        /// Id of the farm or collectible delivered to the winner
        asset_id: u64,
    },
    /// No bids; the escrowed asset went back to the seller
    Returned { seller: AccountId },
    /// No bids on a house lot, or its collectible sold out before the
    /// lot ended and the winning bid was refunded; nothing was minted
    Unsold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub lot_id: LotId,
    pub kind: LotKind,
    pub asset_type: String,
    pub outcome: SettlementOutcome,
}

/// End an active lot inside a running transaction.
///
/// A winning bid on a house lot has no seller to pay and is burned; the
/// asset is minted for the winner. If the collectible's mint cap was
/// reached while the lot ran, the winner is refunded instead. Farms leave
/// escrow inactive.
pub(crate) fn settle_lot(
    tx: &Txn<'_>,
    catalog: &Catalog,
    mut lot: AuctionLot,
    now: i64,
) -> TxResult<Settlement> {
    if !lot.is_active() {
        return abort(EconomyError::AuctionNotFound(lot.id));
    }

    let escrow = lot.escrow.take();
    let mint_cap = match (lot.kind, &escrow) {
        (LotKind::Nft, None) => catalog.nft(&lot.asset_type).ok().and_then(|e| e.mint_cap),
        _ => None,
    };
    let sold_out = match mint_cap {
        Some(cap) => tx.minted(&lot.asset_type)? >= cap,
        None => false,
    };

    let outcome = match (lot.current_bidder, lot.seller) {
        (Some(winner), None) if sold_out => {
            tx.credit(winner, Currency::Primary, lot.current_bid)?;
            log::warn!(
                "Lot {}: '{}' sold out, refunded {} to account {}",
                lot.id,
                lot.asset_type,
                lot.current_bid,
                winner
            );
            SettlementOutcome::Unsold
        }
        (Some(winner), seller) => {
            if let Some(seller) = seller {
                tx.credit(seller, Currency::Primary, lot.current_bid)?;
            }
            let asset_id = deliver(tx, &lot, escrow, mint_cap, winner, now)?;
            SettlementOutcome::Sold {
                winner,
                price: lot.current_bid,
                asset_id,
            }
        }
        (None, Some(seller)) => {
            match escrow {
                Some(asset) => {
                    deliver(tx, &lot, Some(asset), None, seller, now)?;
                }
                None => {
                    return abort(EconomyError::invalid_state(format!(
                        "lot {} has no escrowed asset to return",
                        lot.id
                    )))
                }
            }
            SettlementOutcome::Returned { seller }
        }
        (None, None) => SettlementOutcome::Unsold,
    };

    lot.status = LotStatus::Ended;
    tx.put_lot(&lot)?;

    Ok(Settlement {
        lot_id: lot.id,
        kind: lot.kind,
        asset_type: lot.asset_type.clone(),
        outcome,
    })
}

/// Hand the lot's asset to `recipient`, minting it for house lots
fn deliver(
    tx: &Txn<'_>,
    lot: &AuctionLot,
    escrow: Option<EscrowedAsset>,
    mint_cap: Option<u64>,
    recipient: AccountId,
    now: i64,
) -> TxResult<u64> {
    match escrow {
        Some(EscrowedAsset::Farm(mut farm)) => {
            farm.owner = recipient;
            farm.active = false;
            farm.last_activated = None;
            tx.insert_farm(&farm)?;
            Ok(farm.id)
        }
        Some(EscrowedAsset::Nft(mut nft)) => {
            nft.owner = recipient;
            tx.insert_nft(&nft)?;
            Ok(nft.id)
        }
        None => match lot.kind {
            LotKind::Farm => Ok(tx.add_farm(recipient, &lot.asset_type, now)?.id),
            LotKind::Nft => {
                tx.record_mint(&lot.asset_type, mint_cap)?;
                Ok(tx.add_nft(recipient, &lot.asset_type, now)?.id)
            }
        },
    }
}
