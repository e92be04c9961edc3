//! Owned assets: yield-generating farms and boost-granting collectibles

use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::constants::{MAX_UPGRADE_LEVEL, MIN_UPGRADE_LEVEL};

pub type FarmId = u64;
pub type NftId = u64;

/// Which of the two independent farm upgrade tracks to raise
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UpgradeKind {
    /// Raises hourly yield
    Speed,
    /// Extends the activation window
    Capacity,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Farm {
    pub id: FarmId,
    pub owner: AccountId,
    pub farm_type: String,
    pub purchased_at: i64,
    pub last_activated: Option<i64>,
    pub active: bool,
    pub speed_level: u8,
    pub capacity_level: u8,
}

impl Farm {
    /// A newly acquired, inactive farm at base levels
    pub fn new(id: FarmId, owner: AccountId, farm_type: impl Into<String>, now: i64) -> Self {
        Self {
            id,
            owner,
            farm_type: farm_type.into(),
            purchased_at: now,
            last_activated: None,
            active: false,
            speed_level: MIN_UPGRADE_LEVEL,
            capacity_level: MIN_UPGRADE_LEVEL,
        }
    }

    pub fn level(&self, kind: UpgradeKind) -> u8 {
        match kind {
            UpgradeKind::Speed => self.speed_level,
            UpgradeKind::Capacity => self.capacity_level,
        }
    }

    /// Raise one upgrade track by a level. Returns the new level, or None at the ceiling.
    pub fn raise(&mut self, kind: UpgradeKind) -> Option<u8> {
        let level = match kind {
            UpgradeKind::Speed => &mut self.speed_level,
            UpgradeKind::Capacity => &mut self.capacity_level,
        };
        if *level >= MAX_UPGRADE_LEVEL {
            return None;
        }
        *level += 1;
        Some(*level)
    }

    /// Timestamp the current activation window started at
    pub fn activation_start(&self) -> i64 {
        self.last_activated.unwrap_or(self.purchased_at)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Nft {
    pub id: NftId,
    pub owner: AccountId,
    pub nft_type: String,
    pub purchased_at: i64,
}

impl Nft {
    pub fn new(id: NftId, owner: AccountId, nft_type: impl Into<String>, now: i64) -> Self {
        Self {
            id,
            owner,
            nft_type: nft_type.into(),
            purchased_at: now,
        }
    }
}
