//! Collectibles, exchange packs and cases

use farm_core::{AccountId, CaseReward, Currency, EconomyError, Nft, Result};
use farm_storage::abort;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::service::EconomyService;

/// What a case paid out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CaseOutcome {
    Primary(u64),
    Secondary(u64),
    Collectible(Nft),
}

impl EconomyService {
    /// Buy a collectible at its flat catalog price
    pub fn purchase_collectible(&self, id: AccountId, nft_type: &str) -> Result<Nft> {
        let entry = self.config.catalog.nft(nft_type)?;
        let now = self.now();

        let nft = self.store.transact(|tx| {
            tx.debit(id, Currency::Primary, entry.price)?;
            tx.record_mint(nft_type, entry.mint_cap)?;
            let nft = tx.add_nft(id, nft_type, now)?;
            self.award_spend(tx, id, entry.price)?;
            Ok(nft)
        })?;

        log::info!(
            "Account {} bought collectible {} ('{}') for {}",
            id,
            nft.id,
            nft_type,
            entry.price
        );
        Ok(nft)
    }

    /// Add a collectible without payment. Mint caps still apply.
    pub fn grant_nft(&self, id: AccountId, nft_type: &str) -> Result<Nft> {
        let entry = self.config.catalog.nft(nft_type)?;
        let now = self.now();
        let nft = self.store.transact(|tx| {
            tx.record_mint(nft_type, entry.mint_cap)?;
            tx.add_nft(id, nft_type, now)
        })?;
        log::info!("Granted collectible {} ('{}') to account {}", nft.id, nft_type, id);
        Ok(nft)
    }

    /// Trade secondary currency for a pack of primary. Returns the primary
    /// amount credited.
    pub fn exchange_pack(&self, id: AccountId, pack: &str) -> Result<u64> {
        let entry = self.config.catalog.pack(pack)?;
        self.store.transact(|tx| {
            tx.debit(id, Currency::Secondary, entry.price)?;
            tx.credit(id, Currency::Primary, entry.amount)
        })?;
        log::debug!("Account {} exchanged pack '{}'", id, pack);
        Ok(entry.amount)
    }

    /// Open a case paid in secondary currency. A collectible reward picks
    /// uniformly among types that are not sold out; the case is refused
    /// if none remain.
    pub fn open_case(&self, id: AccountId, case: &str) -> Result<CaseOutcome> {
        let entry = self.config.catalog.case(case)?;
        let catalog = &self.config.catalog;
        let now = self.now();
        let seed = self.roll_seed();

        let outcome = self.store.transact(|tx| {
            let mut rng = StdRng::seed_from_u64(seed);
            tx.debit(id, Currency::Secondary, entry.price)?;

            let roll = rng.random_range(0..entry.total_weight());
            let reward = match entry.pick(roll) {
                Some(reward) => reward,
                None => return abort(EconomyError::invalid_state("case has no rewards")),
            };

            match reward.reward {
                CaseReward::Primary => {
                    if reward.amount > 0 {
                        tx.credit(id, Currency::Primary, reward.amount)?;
                    }
                    Ok(CaseOutcome::Primary(reward.amount))
                }
                CaseReward::Secondary => {
                    if reward.amount > 0 {
                        tx.credit(id, Currency::Secondary, reward.amount)?;
                    }
                    Ok(CaseOutcome::Secondary(reward.amount))
                }
                CaseReward::Nft => {
                    let mut available = Vec::new();
                    for (key, nft) in &catalog.nfts {
                        let sold_out = match nft.mint_cap {
                            Some(cap) => tx.minted(key)? >= cap,
                            None => false,
                        };
                        if !sold_out {
                            available.push((key, nft.mint_cap));
                        }
                    }
                    if available.is_empty() {
                        return abort(EconomyError::invalid_state("every collectible is sold out"));
                    }
                    let (nft_type, cap) = available[rng.random_range(0..available.len())];
                    tx.record_mint(nft_type, cap)?;
                    Ok(CaseOutcome::Collectible(tx.add_nft(id, nft_type, now)?))
                }
            }
        })?;

        log::debug!("Account {} opened '{}': {:?}", id, case, outcome);
        Ok(outcome)
    }
}
