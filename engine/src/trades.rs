//! Direct farm sales between two accounts

use farm_core::{
    AccountId, Currency, EconomyError, FarmId, FarmTrade, Result, TradeId, TradeStatus,
};
use farm_storage::abort;

use crate::service::EconomyService;

impl EconomyService {
    /// Offer one of the seller's farms to a specific buyer for a price
    pub fn offer_trade(
        &self,
        seller: AccountId,
        buyer: AccountId,
        farm_id: FarmId,
        price: u64,
    ) -> Result<FarmTrade> {
        if price == 0 {
            return Err(EconomyError::validation("trade price must be positive"));
        }
        if seller == buyer {
            return Err(EconomyError::validation("cannot trade with yourself"));
        }
        let now = self.now();

        let trade = self.store.transact(|tx| {
            match tx.find_farm(farm_id)? {
                Some(farm) if farm.owner == seller => {}
                _ => return abort(EconomyError::FarmNotFound(farm_id)),
            }
            tx.account(buyer)?;
            let trade = FarmTrade {
                id: tx.next_id("trade")?,
                seller,
                buyer,
                farm_id,
                price,
                status: TradeStatus::Pending,
                created_at: now,
            };
            tx.put_trade(&trade)?;
            Ok(trade)
        })?;

        log::info!(
            "Trade {} offered: farm {} from {} to {} for {}",
            trade.id,
            farm_id,
            seller,
            buyer,
            price
        );
        Ok(trade)
    }

    /// Buyer accepts: payment and ownership move in one transaction.
    /// Fails with `Conflict` if the seller no longer owns the farm.
    pub fn accept_trade(&self, buyer: AccountId, trade_id: TradeId) -> Result<FarmTrade> {
        let trade = self.store.transact(|tx| {
            let mut trade = match tx.find_trade(trade_id)? {
                Some(trade) if trade.buyer == buyer => trade,
                _ => return abort(EconomyError::TradeNotFound(trade_id)),
            };
            if trade.status != TradeStatus::Pending {
                return abort(EconomyError::invalid_state(format!(
                    "trade {} is already {:?}",
                    trade_id, trade.status
                )));
            }
            match tx.find_farm(trade.farm_id)? {
                Some(farm) if farm.owner == trade.seller => {}
                _ => {
                    return abort(EconomyError::Conflict(format!(
                        "farm {} changed hands since the offer",
                        trade.farm_id
                    )))
                }
            }

            tx.transfer(buyer, trade.seller, Currency::Primary, trade.price)?;
            tx.reassign_farm(trade.farm_id, trade.seller, buyer)?;
            trade.status = TradeStatus::Accepted;
            tx.put_trade(&trade)?;
            Ok(trade)
        })?;

        log::info!(
            "Trade {} accepted: farm {} now owned by {}",
            trade.id,
            trade.farm_id,
            buyer
        );
        Ok(trade)
    }

    /// Either party may decline a pending offer
    pub fn decline_trade(&self, actor: AccountId, trade_id: TradeId) -> Result<FarmTrade> {
        self.store.transact(|tx| {
            let mut trade = match tx.find_trade(trade_id)? {
                Some(trade) if trade.buyer == actor || trade.seller == actor => trade,
                _ => return abort(EconomyError::TradeNotFound(trade_id)),
            };
            if trade.status != TradeStatus::Pending {
                return abort(EconomyError::invalid_state(format!(
                    "trade {} is already {:?}",
                    trade_id, trade.status
                )));
            }
            trade.status = TradeStatus::Declined;
            tx.put_trade(&trade)?;
            Ok(trade)
        })
    }

    /// Pending offers where the account is buyer or seller
    pub fn pending_trades(&self, id: AccountId) -> Result<Vec<FarmTrade>> {
        Ok(self
            .store
            .trades()?
            .into_iter()
            .filter(|t| t.status == TradeStatus::Pending && (t.buyer == id || t.seller == id))
            .collect())
    }
}
