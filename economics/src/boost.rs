//! Yield boost stacking

use farm_core::config::BoostConfig;
use farm_core::{Catalog, GlobalBuff, Nft};

pub struct BoostCalculator;

impl BoostCalculator {
    /// Combine collectible boosts, account level and an optional buff
    /// multiplier into one yield multiplier.
    ///
    /// The bonus portion of each collectible (`boost - 1.0`) is summed, so
    /// duplicates each count. The sum is then scaled by the level factor
    /// and the buff, and clamped to the configured ceiling.
    pub fn compute<I>(nft_boosts: I, level: u32, buff: Option<f64>, config: &BoostConfig) -> f64
    where
        I: IntoIterator<Item = f64>,
    {
        let mut boost = 1.0;
        for factor in nft_boosts {
            boost += factor - 1.0;
        }

        boost *= Self::level_factor(level, config);

        if let Some(multiplier) = buff {
            boost *= multiplier;
        }

        boost.min(config.ceiling)
    }

    pub fn level_factor(level: u32, config: &BoostConfig) -> f64 {
        1.0 + level.saturating_sub(1) as f64 * config.level_bonus
    }

    /// Boost of an account from its owned collectibles and the buffs on
    /// record. Collectibles whose type left the catalog contribute nothing.
    pub fn for_account(
        nfts: &[Nft],
        catalog: &Catalog,
        level: u32,
        buffs: &[GlobalBuff],
        now: i64,
        config: &BoostConfig,
    ) -> f64 {
        let boosts = nfts.iter().filter_map(|nft| match catalog.nfts.get(&nft.nft_type) {
            Some(entry) => Some(entry.boost),
            None => {
                log::warn!(
                    "Collectible {} has unknown type '{}', ignoring its boost",
                    nft.id,
                    nft.nft_type
                );
                None
            }
        });
        let buff = GlobalBuff::latest_active(buffs, now).map(|b| b.multiplier);
        Self::compute(boosts, level, buff, config)
    }
}
