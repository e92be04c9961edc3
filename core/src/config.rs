//! Economy configuration (TOML)
//!
//! Every tunable has a default matching the live game's balance, so an
//! empty file yields a working economy. Example:
//!
//! ```toml
//! starting_primary = 200
//!
//! [boost]
//! ceiling = 2.5
//!
//! [catalog.farms.pumpkin]
//! name = "Pumpkin Patch"
//! price = 1500
//! income_per_hour = 1300
//! kind = { type = "limited", available_until = 1767225600 }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::catalog::Catalog;
use crate::error::{EconomyError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoostConfig {
    /// Upper clamp of the combined multiplier
    pub ceiling: f64,
    /// Multiplier gained per account level above 1
    pub level_bonus: f64,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            ceiling: 2.5,
            level_bonus: 0.005,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AccrualConfig {
    /// Longest stretch a single claim can pay for
    pub max_backlog_hours: f64,
    /// Activation window at capacity level 1
    pub base_window_hours: f64,
    /// Geometric growth of the window per capacity level
    pub window_growth: f64,
    /// Yield bonus per speed level above 1
    pub speed_bonus: f64,
}

impl Default for AccrualConfig {
    fn default() -> Self {
        Self {
            max_backlog_hours: 24.0,
            base_window_hours: 6.0,
            window_growth: 1.35,
            speed_bonus: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PricingConfig {
    /// Price growth per farm of the same type already owned
    pub growth: f64,
    /// First upgrade costs this fraction of the farm's base price
    pub upgrade_cost_factor: f64,
    /// Upgrade cost growth per level already reached
    pub upgrade_cost_growth: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            growth: 1.5,
            upgrade_cost_factor: 0.5,
            upgrade_cost_growth: 1.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuctionConfig {
    pub default_duration_hours: u64,
    pub max_duration_hours: u64,
    /// Starting price may not exceed `catalog price / divisor`
    pub start_price_divisor: f64,
    /// How often the daemon settles expired lots
    pub sweep_interval_secs: u64,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            default_duration_hours: 24,
            max_duration_hours: 168,
            start_price_divisor: 1.5,
            sweep_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DropConfig {
    /// Chance per active farm of one secondary unit on claim
    pub chance_per_farm: f64,
    /// One guaranteed secondary unit per this many active farms
    pub farms_per_guaranteed: u64,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            chance_per_farm: 0.015,
            farms_per_guaranteed: 40,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Primary-equivalent spend per experience point
    pub spend_per_xp: u64,
    /// Experience scale of the square-root level curve
    pub xp_per_level_step: u64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            spend_per_xp: 10,
            xp_per_level_step: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_primary: u64,
    pub starting_secondary: u64,
    pub boost: BoostConfig,
    pub accrual: AccrualConfig,
    pub pricing: PricingConfig,
    pub auction: AuctionConfig,
    pub drops: DropConfig,
    pub progression: ProgressionConfig,
    pub catalog: Catalog,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_primary: 200,
            starting_secondary: 0,
            boost: BoostConfig::default(),
            accrual: AccrualConfig::default(),
            pricing: PricingConfig::default(),
            auction: AuctionConfig::default(),
            drops: DropConfig::default(),
            progression: ProgressionConfig::default(),
            catalog: Catalog::default(),
        }
    }
}

impl EconomyConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: EconomyConfig =
            toml::from_str(contents).map_err(|e| EconomyError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            EconomyError::Config(format!("{}: {}", path.as_ref().display(), e))
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::info!(
            "Loaded economy config from {} ({} farm types, {} collectibles)",
            path.as_ref().display(),
            config.catalog.farms.len(),
            config.catalog.nfts.len()
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.boost.ceiling >= 1.0) {
            return Err(EconomyError::Config("boost.ceiling must be >= 1.0".into()));
        }
        if self.boost.level_bonus < 0.0 || self.accrual.speed_bonus < 0.0 {
            return Err(EconomyError::Config("bonuses must be non-negative".into()));
        }
        if !(self.accrual.base_window_hours > 0.0) || !(self.accrual.max_backlog_hours > 0.0) {
            return Err(EconomyError::Config(
                "accrual windows must be positive".into(),
            ));
        }
        if self.accrual.window_growth < 1.0 || self.pricing.growth < 1.0 {
            return Err(EconomyError::Config("growth factors must be >= 1.0".into()));
        }
        if !(self.auction.start_price_divisor >= 1.0) {
            return Err(EconomyError::Config(
                "auction.start_price_divisor must be >= 1.0".into(),
            ));
        }
        if self.auction.default_duration_hours == 0
            || self.auction.default_duration_hours > self.auction.max_duration_hours
        {
            return Err(EconomyError::Config(
                "auction.default_duration_hours must be within 1..=max_duration_hours".into(),
            ));
        }
        if self.auction.sweep_interval_secs == 0 {
            return Err(EconomyError::Config(
                "auction.sweep_interval_secs must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.drops.chance_per_farm) {
            return Err(EconomyError::Config(
                "drops.chance_per_farm must be a probability".into(),
            ));
        }
        if self.progression.spend_per_xp == 0 || self.progression.xp_per_level_step == 0 {
            return Err(EconomyError::Config(
                "progression steps must be positive".into(),
            ));
        }
        self.catalog.validate()
    }
}
