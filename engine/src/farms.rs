//! Farm purchases, activation, claims and upgrades

use farm_core::{
    AccountId, Currency, EconomyError, Farm, FarmEntry, FarmId, FarmKind, Result, UpgradeKind,
};
use farm_economics::{AccrualEngine, BoostCalculator, DropCalculator, PriceCalculator};
use farm_storage::{abort, lift};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::service::EconomyService;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub farm: Farm,
    pub price: u64,
}

/// Outcome of one yield claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimReport {
    /// Primary currency credited
    pub credited: u64,
    /// Secondary currency dropped
    pub secondary_dropped: u64,
    /// Multiplier applied to the base yield
    pub boost: f64,
    /// Farms whose activation window ran out and were switched off
    pub deactivated: usize,
}

fn check_purchasable(farm_type: &str, entry: &FarmEntry, now: i64) -> Result<()> {
    if entry.purchasable_at(now) {
        return Ok(());
    }
    Err(match entry.kind {
        FarmKind::CaseSourced => EconomyError::invalid_state(format!(
            "'{}' cannot be bought, it only comes from cases",
            farm_type
        )),
        _ => EconomyError::invalid_state(format!("'{}' is no longer on sale", farm_type)),
    })
}

impl EconomyService {
    /// Price the account would pay for its next farm of `farm_type`
    pub fn quote_farm_price(&self, id: AccountId, farm_type: &str) -> Result<u64> {
        let entry = self.config.catalog.farm(farm_type)?;
        let growth = self.config.pricing.growth;
        let owned = self.store.transact(|tx| {
            tx.account(id)?;
            tx.count_farms_of_type(id, farm_type)
        })?;
        Ok(PriceCalculator::next_price(entry.price, owned, growth))
    }

    /// Buy one farm at the dynamic price
    pub fn purchase_farm(&self, id: AccountId, farm_type: &str) -> Result<PurchaseReceipt> {
        self.buy_farm(id, farm_type, None)
    }

    /// Buy one farm only if its price still equals a previously shown quote.
    /// Fails with `Conflict` when the price moved in between.
    pub fn purchase_farm_quoted(
        &self,
        id: AccountId,
        farm_type: &str,
        quoted_price: u64,
    ) -> Result<PurchaseReceipt> {
        self.buy_farm(id, farm_type, Some(quoted_price))
    }

    fn buy_farm(&self, id: AccountId, farm_type: &str, quoted: Option<u64>) -> Result<PurchaseReceipt> {
        let now = self.now();
        let entry = self.config.catalog.farm(farm_type)?;
        check_purchasable(farm_type, entry, now)?;
        let growth = self.config.pricing.growth;

        let receipt = self.store.transact(|tx| {
            let owned = tx.count_farms_of_type(id, farm_type)?;
            let price = PriceCalculator::next_price(entry.price, owned, growth);
            if let Some(quoted) = quoted {
                if quoted != price {
                    return abort(EconomyError::Conflict(format!(
                        "price of '{}' changed from {} to {}",
                        farm_type, quoted, price
                    )));
                }
            }
            tx.debit(id, Currency::Primary, price)?;
            let farm = tx.add_farm(id, farm_type, now)?;
            self.award_spend(tx, id, price)?;
            Ok(PurchaseReceipt { farm, price })
        })?;

        log::info!(
            "Account {} bought farm {} ('{}') for {}",
            id,
            receipt.farm.id,
            farm_type,
            receipt.price
        );
        Ok(receipt)
    }

    /// Add a farm without payment. Any catalog type may be granted.
    pub fn grant_farm(&self, id: AccountId, farm_type: &str) -> Result<Farm> {
        self.config.catalog.farm(farm_type)?;
        let now = self.now();
        let farm = self.store.transact(|tx| tx.add_farm(id, farm_type, now))?;
        log::info!("Granted farm {} ('{}') to account {}", farm.id, farm_type, id);
        Ok(farm)
    }

    /// Start a new activation window on every farm that is idle or whose
    /// window has run out. Returns `(activated, total)`.
    pub fn activate_farms(&self, id: AccountId) -> Result<(usize, usize)> {
        let now = self.now();
        let accrual = &self.config.accrual;

        let counts = self.store.transact(|tx| {
            tx.account(id)?;
            let farms = tx.farms_of(id)?;
            if farms.is_empty() {
                return abort(EconomyError::invalid_state("no farms to activate"));
            }

            let mut activated = 0;
            for mut farm in farms.iter().cloned() {
                let due = !farm.active
                    || farm.last_activated.is_none()
                    || AccrualEngine::is_expired(&farm, now, accrual);
                if due {
                    farm.active = true;
                    farm.last_activated = Some(now);
                    tx.put_farm(&farm)?;
                    activated += 1;
                }
            }
            Ok((activated, farms.len()))
        })?;

        log::debug!(
            "Account {} activated {} of {} farms",
            id,
            counts.0,
            counts.1
        );
        Ok(counts)
    }

    /// Pay the account for everything its farms produced since the last
    /// claim. A claim that accrues nothing is not an error.
    pub fn claim_yield(&self, id: AccountId) -> Result<ClaimReport> {
        let now = self.now();
        let seed = self.roll_seed();
        let config = &self.config;

        let report = self.store.transact(|tx| {
            let mut account = tx.account(id)?;
            let farms = tx.farms_of(id)?;
            let nfts = tx.nfts_of(id)?;
            let buffs = tx.buffs()?;

            let plan = AccrualEngine::plan(
                &farms,
                account.last_claim,
                now,
                &config.catalog,
                &config.accrual,
            );
            for farm in farms.iter().filter(|f| plan.expired.contains(&f.id)) {
                let mut farm = farm.clone();
                farm.active = false;
                tx.put_farm(&farm)?;
            }

            let boost = BoostCalculator::for_account(
                &nfts,
                &config.catalog,
                account.level,
                &buffs,
                now,
                &config.boost,
            );
            let credited = plan.payout(boost);
            let secondary_dropped = if credited > 0 {
                let mut rng = StdRng::seed_from_u64(seed);
                DropCalculator::roll(plan.active_farms, &config.drops, &mut rng)
            } else {
                0
            };

            account.last_claim = now;
            tx.put_account(&account)?;
            if credited > 0 {
                tx.credit(id, Currency::Primary, credited)?;
            }
            if secondary_dropped > 0 {
                tx.credit(id, Currency::Secondary, secondary_dropped)?;
            }

            Ok(ClaimReport {
                credited,
                secondary_dropped,
                boost,
                deactivated: plan.expired.len(),
            })
        })?;

        if report.credited > 0 || report.deactivated > 0 {
            log::debug!(
                "Account {} claimed {} (boost {:.3}, {} secondary, {} farms expired)",
                id,
                report.credited,
                report.boost,
                report.secondary_dropped,
                report.deactivated
            );
        }
        Ok(report)
    }

    /// Raise one upgrade track of a farm by a level, paying the upgrade cost
    pub fn upgrade_farm(&self, id: AccountId, farm_id: FarmId, kind: UpgradeKind) -> Result<Farm> {
        let catalog = &self.config.catalog;
        let pricing = &self.config.pricing;

        let (farm, cost) = self.store.transact(|tx| {
            let mut farm = match tx.find_farm(farm_id)? {
                Some(farm) if farm.owner == id => farm,
                _ => return abort(EconomyError::FarmNotFound(farm_id)),
            };
            let entry = lift(catalog.farm(&farm.farm_type))?;
            if entry.is_special() {
                return abort(EconomyError::invalid_state(format!(
                    "'{}' cannot be upgraded",
                    farm.farm_type
                )));
            }

            let cost = PriceCalculator::upgrade_cost(entry.price, farm.level(kind), pricing);
            if farm.raise(kind).is_none() {
                return abort(EconomyError::invalid_state(format!(
                    "farm {} is already at the maximum {:?} level",
                    farm_id, kind
                )));
            }
            tx.debit(id, Currency::Primary, cost)?;
            tx.put_farm(&farm)?;
            self.award_spend(tx, id, cost)?;
            Ok((farm, cost))
        })?;

        log::info!(
            "Account {} upgraded farm {} {:?} to level {} for {}",
            id,
            farm_id,
            kind,
            farm.level(kind),
            cost
        );
        Ok(farm)
    }

    /// Combined hourly yield of the account's producing farms, boosted.
    /// Idle farms and farms past their activation window earn nothing.
    pub fn hourly_income(&self, id: AccountId) -> Result<u64> {
        let now = self.now();
        let farms = self.list_farms(id)?;
        let boost = self.boost(id)?;
        let base: f64 = farms
            .iter()
            .filter(|farm| {
                farm.active && !AccrualEngine::is_expired(farm, now, &self.config.accrual)
            })
            .filter_map(|farm| {
                self.config
                    .catalog
                    .farms
                    .get(&farm.farm_type)
                    .map(|entry| AccrualEngine::hourly_yield(farm, entry, &self.config.accrual))
            })
            .sum();
        Ok((base * boost) as u64)
    }
}
