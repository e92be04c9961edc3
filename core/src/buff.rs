//! Server-wide temporary yield multipliers

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalBuff {
    pub id: u64,
    pub multiplier: f64,
    pub starts_at: i64,
    pub ends_at: i64,
}

impl GlobalBuff {
    pub fn is_active(&self, now: i64) -> bool {
        self.starts_at <= now && now < self.ends_at
    }

    /// The latest-started buff still running at `now`
    pub fn latest_active(buffs: &[GlobalBuff], now: i64) -> Option<&GlobalBuff> {
        buffs
            .iter()
            .filter(|b| b.is_active(now))
            .max_by_key(|b| (b.starts_at, b.id))
    }
}
