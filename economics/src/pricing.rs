//! Purchase, upgrade and listing price calculations

use farm_core::config::PricingConfig;

pub struct PriceCalculator;

impl PriceCalculator {
    /// Price of the next farm of a type: `round(base * growth^owned)`,
    /// never below `base`.
    pub fn next_price(base_price: u64, owned: u32, growth: f64) -> u64 {
        let exponent = owned.min(i32::MAX as u32) as i32;
        let price = (base_price as f64 * growth.powi(exponent)).round();
        // float-to-int casts saturate
        (price as u64).max(base_price)
    }

    /// Cost of raising an upgrade from `current_level` to the next level
    pub fn upgrade_cost(base_price: u64, current_level: u8, config: &PricingConfig) -> u64 {
        let steps = current_level.saturating_sub(1) as i32;
        let cost = base_price as f64
            * config.upgrade_cost_factor
            * config.upgrade_cost_growth.powi(steps);
        (cost.round() as u64).max(1)
    }

    /// Highest starting price allowed when listing an asset at auction
    pub fn max_starting_price(catalog_price: u64, divisor: f64) -> u64 {
        ((catalog_price as f64 / divisor).floor() as u64).max(1)
    }
}
