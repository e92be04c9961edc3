//! Typed catalog registry
//!
//! Every purchasable or droppable asset type is resolved once at startup
//! into a [`Catalog`]. Lookups are by type key; unknown keys are a
//! `NotFound`-class error rather than a silent zero.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{EconomyError, Result};

/// How a farm type enters the economy
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FarmKind {
    /// Sold in the shop, upgradable
    #[default]
    Ordinary,
    /// Only obtainable from cases, grants and auctions
    CaseSourced,
    /// Time-limited special; fixed yield, not upgradable
    Limited { available_until: i64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FarmEntry {
    pub name: String,
    /// Flat catalog price in primary currency
    pub price: u64,
    pub income_per_hour: u64,
    #[serde(default)]
    pub kind: FarmKind,
}

impl FarmEntry {
    pub fn is_special(&self) -> bool {
        matches!(self.kind, FarmKind::Limited { .. })
    }

    /// Whether the shop sells this type at `now`
    pub fn purchasable_at(&self, now: i64) -> bool {
        match self.kind {
            FarmKind::Ordinary => true,
            FarmKind::CaseSourced => false,
            FarmKind::Limited { available_until } => now < available_until,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NftEntry {
    pub name: String,
    pub price: u64,
    /// Yield multiplier; the bonus portion `boost - 1.0` stacks additively
    pub boost: f64,
    #[serde(default)]
    pub mint_cap: Option<u64>,
}

/// Secondary-to-primary exchange offer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExchangePack {
    pub name: String,
    /// Cost in secondary currency
    pub price: u64,
    /// Primary currency granted
    pub amount: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseReward {
    Primary,
    Secondary,
    /// A random collectible that is not sold out
    Nft,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseRewardEntry {
    pub reward: CaseReward,
    #[serde(default)]
    pub amount: u64,
    pub weight: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseEntry {
    pub name: String,
    /// Cost in secondary currency
    pub price: u64,
    pub rewards: Vec<CaseRewardEntry>,
}

impl CaseEntry {
    pub fn total_weight(&self) -> u32 {
        self.rewards.iter().map(|r| r.weight).sum()
    }

    /// Pick the reward whose cumulative weight range contains `roll`
    /// (`roll` must be below `total_weight()`).
    pub fn pick(&self, roll: u32) -> Option<&CaseRewardEntry> {
        let mut acc = 0u32;
        for entry in &self.rewards {
            acc += entry.weight;
            if roll < acc {
                return Some(entry);
            }
        }
        None
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    #[serde(default = "default_farms")]
    pub farms: BTreeMap<String, FarmEntry>,
    #[serde(default = "default_nfts")]
    pub nfts: BTreeMap<String, NftEntry>,
    #[serde(default = "default_packs")]
    pub packs: BTreeMap<String, ExchangePack>,
    #[serde(default = "default_cases")]
    pub cases: BTreeMap<String, CaseEntry>,
}

// A partial [catalog] section only replaces the tables it names.
fn default_farms() -> BTreeMap<String, FarmEntry> {
    Catalog::default().farms
}

fn default_nfts() -> BTreeMap<String, NftEntry> {
    Catalog::default().nfts
}

fn default_packs() -> BTreeMap<String, ExchangePack> {
    Catalog::default().packs
}

fn default_cases() -> BTreeMap<String, CaseEntry> {
    Catalog::default().cases
}

impl Catalog {
    pub fn farm(&self, key: &str) -> Result<&FarmEntry> {
        self.farms
            .get(key)
            .ok_or_else(|| EconomyError::UnknownFarmType(key.to_string()))
    }

    pub fn nft(&self, key: &str) -> Result<&NftEntry> {
        self.nfts
            .get(key)
            .ok_or_else(|| EconomyError::UnknownNftType(key.to_string()))
    }

    pub fn pack(&self, key: &str) -> Result<&ExchangePack> {
        self.packs
            .get(key)
            .ok_or_else(|| EconomyError::UnknownPack(key.to_string()))
    }

    pub fn case(&self, key: &str) -> Result<&CaseEntry> {
        self.cases
            .get(key)
            .ok_or_else(|| EconomyError::UnknownCase(key.to_string()))
    }

    /// Reject entries that would break economic invariants
    pub fn validate(&self) -> Result<()> {
        for (key, farm) in &self.farms {
            if farm.price == 0 || farm.income_per_hour == 0 {
                return Err(EconomyError::Config(format!(
                    "farm type '{}' needs a positive price and income",
                    key
                )));
            }
        }
        for (key, nft) in &self.nfts {
            if nft.price == 0 || !nft.boost.is_finite() || nft.boost < 1.0 {
                return Err(EconomyError::Config(format!(
                    "collectible '{}' needs a positive price and a boost >= 1.0",
                    key
                )));
            }
        }
        for (key, pack) in &self.packs {
            if pack.price == 0 || pack.amount == 0 {
                return Err(EconomyError::Config(format!(
                    "exchange pack '{}' needs a positive price and amount",
                    key
                )));
            }
        }
        for (key, case) in &self.cases {
            if case.price == 0 || case.total_weight() == 0 {
                return Err(EconomyError::Config(format!(
                    "case '{}' needs a positive price and reward weights",
                    key
                )));
            }
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let farms = [
            ("starter", "Starter Farm", 200, 60),
            ("basic", "Basic Farm", 500, 240),
            ("advanced", "Advanced Farm", 2_000, 1_200),
            ("premium", "Premium Farm", 8_000, 5_400),
            ("elite", "Elite Farm", 25_000, 18_000),
            ("legendary", "Legendary Farm", 75_000, 60_000),
            ("mythic", "Mythic Farm", 200_000, 180_000),
            ("ultimate", "Ultimate Farm", 500_000, 450_000),
            ("quantum", "Quantum Farm", 1_000_000, 900_000),
            ("cosmic", "Cosmic Farm", 2_500_000, 2_250_000),
            ("divine", "Divine Farm", 5_000_000, 4_500_000),
            ("infinity", "Infinity Farm", 10_000_000, 9_000_000),
        ]
        .into_iter()
        .map(|(key, name, price, income)| {
            (
                key.to_string(),
                FarmEntry {
                    name: name.to_string(),
                    price,
                    income_per_hour: income,
                    kind: FarmKind::Ordinary,
                },
            )
        })
        .collect();

        let nfts = [
            ("snoop_dogg", "Snoop Dogg", 5_000, 1.5),
            ("lunar_snake", "Lunar Snake", 3_500, 1.3),
            ("crystal_ball", "Crystal Ball", 6_000, 1.6),
            ("golden_coin", "Golden Coin", 3_000, 1.25),
            ("diamond_ring", "Diamond Ring", 10_000, 2.0),
            ("magic_lamp", "Magic Lamp", 7_500, 1.7),
            ("fire_dragon", "Fire Dragon", 12_000, 2.2),
            ("cosmic_star", "Cosmic Star", 8_000, 1.8),
            ("golden_crown", "Golden Crown", 15_000, 2.5),
            ("mystic_orb", "Mystic Orb", 9_000, 1.9),
        ]
        .into_iter()
        .map(|(key, name, price, boost)| {
            (
                key.to_string(),
                NftEntry {
                    name: name.to_string(),
                    price,
                    boost,
                    mint_cap: None,
                },
            )
        })
        .collect();

        let packs = [
            ("stars_500", "500 stars", 5, 500),
            ("stars_2000", "2000 stars", 15, 2_000),
            ("stars_10000", "10000 stars", 60, 10_000),
        ]
        .into_iter()
        .map(|(key, name, price, amount)| {
            (
                key.to_string(),
                ExchangePack {
                    name: name.to_string(),
                    price,
                    amount,
                },
            )
        })
        .collect();

        let reward = |reward, amount, weight| CaseRewardEntry {
            reward,
            amount,
            weight,
        };
        let mut cases = BTreeMap::new();
        cases.insert(
            "bronze".to_string(),
            CaseEntry {
                name: "Bronze Case".to_string(),
                price: 3,
                rewards: vec![
                    reward(CaseReward::Primary, 200, 60),
                    reward(CaseReward::Primary, 500, 25),
                    reward(CaseReward::Secondary, 1, 10),
                    reward(CaseReward::Nft, 0, 5),
                ],
            },
        );
        cases.insert(
            "silver".to_string(),
            CaseEntry {
                name: "Silver Case".to_string(),
                price: 8,
                rewards: vec![
                    reward(CaseReward::Primary, 800, 55),
                    reward(CaseReward::Primary, 2_000, 25),
                    reward(CaseReward::Secondary, 2, 15),
                    reward(CaseReward::Nft, 0, 5),
                ],
            },
        );
        cases.insert(
            "gold".to_string(),
            CaseEntry {
                name: "Gold Case".to_string(),
                price: 20,
                rewards: vec![
                    reward(CaseReward::Primary, 2_500, 45),
                    reward(CaseReward::Primary, 7_000, 25),
                    reward(CaseReward::Secondary, 5, 20),
                    reward(CaseReward::Nft, 0, 10),
                ],
            },
        );

        Self {
            farms,
            nfts,
            packs,
            cases,
        }
    }
}
