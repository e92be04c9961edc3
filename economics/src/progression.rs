//! Experience and account levels

use farm_core::config::ProgressionConfig;
use farm_core::constants::MAX_ACCOUNT_LEVEL;

pub struct Progression;

impl Progression {
    /// Experience earned by spending `amount` primary currency
    pub fn experience_for_spend(amount: u64, config: &ProgressionConfig) -> u64 {
        amount / config.spend_per_xp
    }

    /// `1 + isqrt(xp / step)`, capped at the maximum account level
    pub fn level_for_experience(experience: u64, config: &ProgressionConfig) -> u32 {
        let steps = experience / config.xp_per_level_step;
        let level = 1u64.saturating_add(isqrt(steps));
        level.min(MAX_ACCOUNT_LEVEL as u64) as u32
    }
}

fn isqrt(n: u64) -> u64 {
    let squared_fits = |r: u64| r.checked_mul(r).is_some_and(|sq| sq <= n);
    let mut root = (n as f64).sqrt() as u64;
    while !squared_fits(root) {
        root -= 1;
    }
    while squared_fits(root + 1) {
        root += 1;
    }
    root
}
