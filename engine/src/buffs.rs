//! Server-wide yield buffs

use farm_core::constants::SECS_PER_HOUR;
use farm_core::{EconomyError, GlobalBuff, Result};

use crate::service::EconomyService;

impl EconomyService {
    /// Start a buff now. Buffs that already ended are pruned from the record.
    pub fn start_global_buff(&self, multiplier: f64, duration_hours: f64) -> Result<GlobalBuff> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(EconomyError::validation("buff multiplier must be positive"));
        }
        if !duration_hours.is_finite() || duration_hours <= 0.0 {
            return Err(EconomyError::validation("buff duration must be positive"));
        }
        let now = self.now();
        let ends_at = now + (duration_hours * SECS_PER_HOUR as f64) as i64;

        let buff = self.store.transact(|tx| {
            let mut buffs = tx.buffs()?;
            buffs.retain(|b| b.ends_at > now);
            let buff = GlobalBuff {
                id: tx.next_id("buff")?,
                multiplier,
                starts_at: now,
                ends_at,
            };
            buffs.push(buff.clone());
            tx.put_buffs(&buffs)?;
            Ok(buff)
        })?;

        log::info!(
            "Global buff {} started: x{} until {}",
            buff.id,
            buff.multiplier,
            buff.ends_at
        );
        Ok(buff)
    }

    /// The buff claims use right now, if any
    pub fn active_global_buff(&self) -> Result<Option<GlobalBuff>> {
        let buffs = self.store.buffs()?;
        Ok(GlobalBuff::latest_active(&buffs, self.now()).cloned())
    }
}
