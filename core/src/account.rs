//! Account records and the two fungible currencies

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::asset::{FarmId, NftId};

/// Stable external identity of an account (e.g. a chat user id)
pub type AccountId = u64;

/// Small sequential id shown to players
pub type DisplayId = u64;

/// The two balances every account holds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Currency {
    /// Main in-game currency, earned from farms
    Primary,
    /// Premium currency, spent in the exchange shop and on cases
    Secondary,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Primary => write!(f, "primary"),
            Currency::Secondary => write!(f, "secondary"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub display_id: DisplayId,
    pub primary: u64,
    pub secondary: u64,
    pub experience: u64,
    pub level: u32,
    /// Unix timestamp of the last yield claim
    pub last_claim: i64,
    pub created_at: i64,
}

impl Account {
    /// Create a fresh account seeded with the starting grant
    pub fn new(
        id: AccountId,
        display_id: DisplayId,
        starting_primary: u64,
        starting_secondary: u64,
        now: i64,
    ) -> Self {
        Self {
            id,
            display_id,
            primary: starting_primary,
            secondary: starting_secondary,
            experience: 0,
            level: 1,
            last_claim: now,
            created_at: now,
        }
    }

    pub fn balance(&self, currency: Currency) -> u64 {
        match currency {
            Currency::Primary => self.primary,
            Currency::Secondary => self.secondary,
        }
    }

    pub fn balance_mut(&mut self, currency: Currency) -> &mut u64 {
        match currency {
            Currency::Primary => &mut self.primary,
            Currency::Secondary => &mut self.secondary,
        }
    }
}

/// Per-account index of owned asset ids
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Holdings {
    pub farms: Vec<FarmId>,
    pub nfts: Vec<NftId>,
}

impl Holdings {
    pub fn add_farm(&mut self, id: FarmId) {
        if !self.farms.contains(&id) {
            self.farms.push(id);
        }
    }

    /// Returns false if the farm was not indexed
    pub fn remove_farm(&mut self, id: FarmId) -> bool {
        let before = self.farms.len();
        self.farms.retain(|f| *f != id);
        self.farms.len() != before
    }

    pub fn add_nft(&mut self, id: NftId) {
        if !self.nfts.contains(&id) {
            self.nfts.push(id);
        }
    }

    /// Returns false if the collectible was not indexed
    pub fn remove_nft(&mut self, id: NftId) -> bool {
        let before = self.nfts.len();
        self.nfts.retain(|n| *n != id);
        self.nfts.len() != before
    }
}
