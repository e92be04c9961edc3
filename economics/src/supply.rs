//! Circulating supply accounting

use farm_core::{Account, AuctionLot, Currency};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SupplyStats {
    /// Sum of all primary balances
    pub primary_balances: u64,
    /// Sum of all secondary balances
    pub secondary_balances: u64,
    /// Primary currency held by active lots for their highest bidders
    pub escrowed_bids: u64,
    pub accounts: u64,
}

impl SupplyStats {
    pub fn collect(accounts: &[Account], lots: &[AuctionLot]) -> Self {
        let mut stats = Self {
            accounts: accounts.len() as u64,
            ..Self::default()
        };
        for account in accounts {
            stats.primary_balances += account.balance(Currency::Primary);
            stats.secondary_balances += account.balance(Currency::Secondary);
        }
        stats.escrowed_bids = lots.iter().map(AuctionLot::escrowed_currency).sum();
        stats
    }

    /// Currency in existence; primary includes escrowed bids
    pub fn circulating(&self, currency: Currency) -> u64 {
        match currency {
            Currency::Primary => self.primary_balances + self.escrowed_bids,
            Currency::Secondary => self.secondary_balances,
        }
    }
}
