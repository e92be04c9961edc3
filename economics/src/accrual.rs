//! Farm yield accrual
//!
//! A claim pays every active farm for the time it has been producing since
//! the account's previous claim. Three bounds apply to each farm's window:
//!
//! - it never starts before the farm's own activation
//! - it never starts before the last claim
//! - it never reaches further back than the farm's capacity window
//!
//! and the whole claim is capped at `max_backlog_hours`. A farm whose
//! activation window has run out is reported as expired and pays nothing.

use farm_core::config::AccrualConfig;
use farm_core::constants::{MAX_UPGRADE_LEVEL, MIN_UPGRADE_LEVEL, SECS_PER_HOUR};
use farm_core::{Catalog, Farm, FarmEntry, FarmId};

/// One farm's share of a claim, before boost
#[derive(Debug, Clone, PartialEq)]
pub struct FarmAccrual {
    pub farm_id: FarmId,
    pub hourly_yield: f64,
    pub hours: f64,
}

impl FarmAccrual {
    pub fn amount(&self) -> f64 {
        self.hourly_yield * self.hours
    }
}

/// Result of evaluating an account's farms at claim time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccrualPlan {
    pub accruals: Vec<FarmAccrual>,
    /// Active farms whose activation window has run out
    pub expired: Vec<FarmId>,
    /// Farms still active after this claim
    pub active_farms: u64,
}

impl AccrualPlan {
    /// Unboosted yield across all farms
    pub fn base_total(&self) -> f64 {
        self.accruals.iter().map(FarmAccrual::amount).sum()
    }

    /// Boosted yield truncated to whole currency units
    pub fn payout(&self, boost: f64) -> u64 {
        let total = self.base_total() * boost;
        if total.is_finite() && total > 0.0 {
            total as u64
        } else {
            0
        }
    }
}

pub struct AccrualEngine;

impl AccrualEngine {
    fn clamp_level(level: u8) -> u8 {
        level.clamp(MIN_UPGRADE_LEVEL, MAX_UPGRADE_LEVEL)
    }

    /// `1 + (level - 1) * speed_bonus`
    pub fn speed_multiplier(level: u8, config: &AccrualConfig) -> f64 {
        1.0 + (Self::clamp_level(level) - 1) as f64 * config.speed_bonus
    }

    /// Activation window in hours: `base * growth^(level - 1)`
    pub fn cap_hours(level: u8, config: &AccrualConfig) -> f64 {
        config.base_window_hours * config.window_growth.powi(Self::clamp_level(level) as i32 - 1)
    }

    pub fn cap_secs(level: u8, config: &AccrualConfig) -> i64 {
        (Self::cap_hours(level, config) * SECS_PER_HOUR as f64) as i64
    }

    /// Hourly yield of a farm; special types ignore speed upgrades
    pub fn hourly_yield(farm: &Farm, entry: &FarmEntry, config: &AccrualConfig) -> f64 {
        let base = entry.income_per_hour as f64;
        if entry.is_special() {
            base
        } else {
            base * Self::speed_multiplier(farm.speed_level, config)
        }
    }

    /// Whether an active farm's activation window has run out at `now`
    pub fn is_expired(farm: &Farm, now: i64, config: &AccrualConfig) -> bool {
        now - farm.activation_start() >= Self::cap_secs(farm.capacity_level, config)
    }

    /// Evaluate every farm of an account whose previous claim was at
    /// `last_claim`.
    pub fn plan(
        farms: &[Farm],
        last_claim: i64,
        now: i64,
        catalog: &Catalog,
        config: &AccrualConfig,
    ) -> AccrualPlan {
        let backlog_secs = (config.max_backlog_hours * SECS_PER_HOUR as f64) as i64;
        let elapsed = (now - last_claim).clamp(0, backlog_secs);

        let mut plan = AccrualPlan::default();
        for farm in farms.iter().filter(|f| f.active) {
            if Self::is_expired(farm, now, config) {
                plan.expired.push(farm.id);
                continue;
            }
            plan.active_farms += 1;

            let entry = match catalog.farms.get(&farm.farm_type) {
                Some(entry) => entry,
                None => {
                    log::warn!(
                        "Farm {} has unknown type '{}', skipping accrual",
                        farm.id,
                        farm.farm_type
                    );
                    continue;
                }
            };

            let cap = Self::cap_secs(farm.capacity_level, config);
            let window_start = farm.activation_start().max(last_claim).max(now - cap);
            let secs = (now - window_start).min(elapsed).max(0);
            if secs == 0 {
                continue;
            }

            plan.accruals.push(FarmAccrual {
                farm_id: farm.id,
                hourly_yield: Self::hourly_yield(farm, entry, config),
                hours: secs as f64 / SECS_PER_HOUR as f64,
            });
        }
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farm_core::FarmKind;

    const HOUR: i64 = SECS_PER_HOUR;

    fn active_farm(id: FarmId, farm_type: &str, activated: i64) -> Farm {
        let mut farm = Farm::new(id, 1, farm_type, 0);
        farm.active = true;
        farm.last_activated = Some(activated);
        farm
    }

    #[test]
    fn test_level_curves() {
        let config = AccrualConfig::default();
        assert_eq!(AccrualEngine::speed_multiplier(1, &config), 1.0);
        assert!((AccrualEngine::speed_multiplier(10, &config) - 1.45).abs() < 1e-9);
        assert_eq!(AccrualEngine::speed_multiplier(0, &config), 1.0);
        assert_eq!(AccrualEngine::speed_multiplier(50, &config), AccrualEngine::speed_multiplier(10, &config));

        assert_eq!(AccrualEngine::cap_hours(1, &config), 6.0);
        assert!((AccrualEngine::cap_hours(2, &config) - 8.1).abs() < 1e-9);
    }

    #[test]
    fn test_pays_since_last_claim() {
        let catalog = Catalog::default();
        let config = AccrualConfig::default();
        // starter yields 60/h
        let farms = vec![active_farm(1, "starter", 0)];

        let plan = AccrualEngine::plan(&farms, 2 * HOUR, 5 * HOUR, &catalog, &config);
        assert_eq!(plan.accruals.len(), 1);
        assert_eq!(plan.accruals[0].hours, 3.0);
        assert_eq!(plan.payout(1.0), 180);
        assert!(plan.expired.is_empty());
    }

    #[test]
    fn test_window_starts_at_activation() {
        let catalog = Catalog::default();
        let config = AccrualConfig::default();
        let farms = vec![active_farm(1, "starter", 4 * HOUR)];

        let plan = AccrualEngine::plan(&farms, 0, 5 * HOUR, &catalog, &config);
        assert_eq!(plan.accruals[0].hours, 1.0);
    }

    #[test]
    fn test_inactive_farms_skipped() {
        let catalog = Catalog::default();
        let config = AccrualConfig::default();
        let farms = vec![Farm::new(1, 1, "starter", 0)];

        let plan = AccrualEngine::plan(&farms, 0, HOUR, &catalog, &config);
        assert_eq!(plan, AccrualPlan::default());
    }

    #[test]
    fn test_expired_window_pays_nothing() {
        let catalog = Catalog::default();
        let config = AccrualConfig::default();
        let farms = vec![active_farm(1, "starter", 0)];

        let plan = AccrualEngine::plan(&farms, 0, 7 * HOUR, &catalog, &config);
        assert_eq!(plan.expired, vec![1]);
        assert_eq!(plan.payout(1.0), 0);
        assert_eq!(plan.active_farms, 0);
    }

    #[test]
    fn test_capacity_upgrade_extends_window() {
        let catalog = Catalog::default();
        let config = AccrualConfig::default();
        let mut farm = active_farm(1, "starter", 0);
        farm.capacity_level = 2;

        let plan = AccrualEngine::plan(&[farm], 0, 7 * HOUR, &catalog, &config);
        assert!(plan.expired.is_empty());
        assert_eq!(plan.payout(1.0), 420);
    }

    #[test]
    fn test_backlog_cap() {
        let catalog = Catalog::default();
        let config = AccrualConfig {
            base_window_hours: 100.0,
            ..AccrualConfig::default()
        };
        let farms = vec![active_farm(1, "starter", 0)];

        let plan = AccrualEngine::plan(&farms, 0, 48 * HOUR, &catalog, &config);
        assert_eq!(plan.accruals[0].hours, 24.0);
    }

    #[test]
    fn test_speed_ignored_for_special_types() {
        let mut catalog = Catalog::default();
        catalog.farms.insert(
            "pumpkin".into(),
            FarmEntry {
                name: "Pumpkin Patch".into(),
                price: 1500,
                income_per_hour: 100,
                kind: FarmKind::Limited {
                    available_until: 0,
                },
            },
        );
        let config = AccrualConfig::default();
        let mut special = active_farm(1, "pumpkin", 0);
        special.speed_level = 5;
        let mut ordinary = active_farm(2, "starter", 0);
        ordinary.speed_level = 5;

        let plan = AccrualEngine::plan(&[special, ordinary], 0, HOUR, &catalog, &config);
        assert_eq!(plan.accruals[0].hourly_yield, 100.0);
        assert!((plan.accruals[1].hourly_yield - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_boost_applied_before_truncation() {
        let plan = AccrualPlan {
            accruals: vec![FarmAccrual {
                farm_id: 1,
                hourly_yield: 60.0,
                hours: 0.5,
            }],
            ..AccrualPlan::default()
        };
        assert_eq!(plan.payout(1.25), 37);
    }
}
