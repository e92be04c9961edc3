//! Leaderboards

use farm_core::{AccountId, Currency, DisplayId, Result};
use serde::{Deserialize, Serialize};

use crate::service::EconomyService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Leaderboard {
    Balance(Currency),
    /// Boosted hourly yield of active, unexpired farms
    Income,
    Collectibles,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub account_id: AccountId,
    pub display_id: DisplayId,
    pub value: u64,
}

impl EconomyService {
    /// Top `limit` accounts, highest value first. Ties go to the older
    /// display id.
    pub fn leaderboard(&self, board: Leaderboard, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let accounts = self.store.accounts()?;
        let mut entries = Vec::with_capacity(accounts.len());
        for account in accounts {
            let value = match board {
                Leaderboard::Balance(currency) => account.balance(currency),
                Leaderboard::Income => self.hourly_income(account.id)?,
                Leaderboard::Collectibles => self.list_collectibles(account.id)?.len() as u64,
            };
            entries.push(LeaderboardEntry {
                account_id: account.id,
                display_id: account.display_id,
                value,
            });
        }
        entries.sort_by(|a, b| b.value.cmp(&a.value).then(a.display_id.cmp(&b.display_id)));
        entries.truncate(limit);
        Ok(entries)
    }
}
