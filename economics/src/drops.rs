//! Secondary currency drops on claim

use farm_core::config::DropConfig;
use rand::Rng;

pub struct DropCalculator;

impl DropCalculator {
    /// Roll the secondary units earned by `active_farms` producing farms:
    /// one independent chance per farm, plus one guaranteed unit for every
    /// full `farms_per_guaranteed` farms.
    pub fn roll<R: Rng + ?Sized>(active_farms: u64, config: &DropConfig, rng: &mut R) -> u64 {
        if active_farms == 0 {
            return 0;
        }

        let mut dropped = 0;
        for _ in 0..active_farms {
            if rng.random_bool(config.chance_per_farm) {
                dropped += 1;
            }
        }
        if config.farms_per_guaranteed > 0 {
            dropped += active_farms / config.farms_per_guaranteed;
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_no_farms_no_drops() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(DropCalculator::roll(0, &DropConfig::default(), &mut rng), 0);
    }

    #[test]
    fn test_guaranteed_units() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = DropConfig {
            chance_per_farm: 0.0,
            farms_per_guaranteed: 40,
        };
        assert_eq!(DropCalculator::roll(39, &config, &mut rng), 0);
        assert_eq!(DropCalculator::roll(85, &config, &mut rng), 2);
    }

    #[test]
    fn test_certain_chance() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = DropConfig {
            chance_per_farm: 1.0,
            farms_per_guaranteed: 0,
        };
        assert_eq!(DropCalculator::roll(5, &config, &mut rng), 5);
    }
}
