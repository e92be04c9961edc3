//! Economy service - accounts, balances and shared plumbing

use std::sync::Arc;

use farm_auction::AuctionHouse;
use farm_core::{
    Account, AccountId, Currency, EconomyConfig, EconomyError, Farm, Nft, NftId, Result,
    SharedClock,
};
use farm_economics::{BoostCalculator, Progression, SupplyStats};
use farm_storage::{AssetStore, Ledger, Store, TxResult, Txn};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct EconomyService {
    pub(crate) store: Store,
    pub(crate) config: Arc<EconomyConfig>,
    pub(crate) clock: SharedClock,
    pub(crate) auctions: AuctionHouse,
    ledger: Ledger,
    assets: AssetStore,
    rng: Mutex<StdRng>,
}

impl EconomyService {
    pub fn new(store: Store, config: EconomyConfig, clock: SharedClock) -> Self {
        Self::with_rng(store, config, clock, StdRng::from_os_rng())
    }

    /// Deterministic drops and case rolls, for tests and replays
    pub fn with_seed(store: Store, config: EconomyConfig, clock: SharedClock, seed: u64) -> Self {
        Self::with_rng(store, config, clock, StdRng::seed_from_u64(seed))
    }

    fn with_rng(store: Store, config: EconomyConfig, clock: SharedClock, rng: StdRng) -> Self {
        let config = Arc::new(config);
        let auctions = AuctionHouse::new(store.clone(), config.clone(), clock.clone());
        Self {
            ledger: Ledger::new(store.clone()),
            assets: AssetStore::new(store.clone()),
            store,
            config,
            clock,
            auctions,
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub(crate) fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Seed for one operation's random rolls. Drawn outside the
    /// transaction so a retried transaction rolls the same values.
    pub(crate) fn roll_seed(&self) -> u64 {
        self.rng.lock().random()
    }

    // ==================== Accounts ====================

    /// Load an account, creating it with the starting grant on first use
    pub fn get_or_create_account(&self, id: AccountId) -> Result<Account> {
        let now = self.now();
        let (primary, secondary) = (self.config.starting_primary, self.config.starting_secondary);
        let (account, created) = self
            .store
            .transact(|tx| tx.get_or_create_account(id, primary, secondary, now))?;
        if created {
            log::info!(
                "Created account {} (#{}) with {} primary",
                id,
                account.display_id,
                primary
            );
        }
        Ok(account)
    }

    pub fn account(&self, id: AccountId) -> Result<Account> {
        self.store.account(id)
    }

    /// Look up an account by its short sequential display id
    pub fn account_by_display_id(&self, display_id: u64) -> Result<Account> {
        self.store
            .account_by_display_id(display_id)?
            .ok_or(EconomyError::AccountNotFound(display_id))
    }

    pub fn get_balance(&self, id: AccountId, currency: Currency) -> Result<u64> {
        Ok(self.store.account(id)?.balance(currency))
    }

    /// Privileged credit, bypassing purchase rules. Returns the new balance.
    pub fn credit_admin(&self, id: AccountId, currency: Currency, amount: u64) -> Result<u64> {
        let balance = self.store.transact(|tx| tx.credit(id, currency, amount))?;
        log::info!("Admin credit: {} {} to account {}", amount, currency, id);
        Ok(balance)
    }

    /// Privileged debit. Still fails with `InsufficientFunds`.
    pub fn debit_admin(&self, id: AccountId, currency: Currency, amount: u64) -> Result<u64> {
        let balance = self.store.transact(|tx| tx.debit(id, currency, amount))?;
        log::info!("Admin debit: {} {} from account {}", amount, currency, id);
        Ok(balance)
    }

    /// Player-to-player payment in either currency
    pub fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        currency: Currency,
        amount: u64,
    ) -> Result<()> {
        self.ledger.transfer(from, to, currency, amount)?;
        log::info!("Account {} sent {} {} to {}", from, amount, currency, to);
        Ok(())
    }

    // ==================== Holdings ====================

    /// Hand a collectible to another account. Its boost moves with it.
    pub fn give_collectible(&self, from: AccountId, to: AccountId, nft_id: NftId) -> Result<Nft> {
        if from == to {
            return Err(EconomyError::validation("cannot give to yourself"));
        }
        let nft = self.assets.reassign_nft(nft_id, from, to)?;
        log::info!("Account {} gave collectible {} to {}", from, nft_id, to);
        Ok(nft)
    }


    pub fn list_farms(&self, id: AccountId) -> Result<Vec<Farm>> {
        let mut farms = self.store.transact(|tx| {
            tx.account(id)?;
            tx.farms_of(id)
        })?;
        farms.sort_by_key(|farm| farm.id);
        Ok(farms)
    }

    pub fn list_collectibles(&self, id: AccountId) -> Result<Vec<Nft>> {
        let mut nfts = self.store.transact(|tx| {
            tx.account(id)?;
            tx.nfts_of(id)
        })?;
        nfts.sort_by_key(|nft| nft.id);
        Ok(nfts)
    }

    /// Current yield multiplier of an account
    pub fn boost(&self, id: AccountId) -> Result<f64> {
        let now = self.now();
        let (account, nfts, buffs) = self
            .store
            .transact(|tx| Ok((tx.account(id)?, tx.nfts_of(id)?, tx.buffs()?)))?;
        Ok(BoostCalculator::for_account(
            &nfts,
            &self.config.catalog,
            account.level,
            &buffs,
            now,
            &self.config.boost,
        ))
    }

    /// Balances plus currency escrowed in active lots
    pub fn circulating_supply(&self) -> Result<SupplyStats> {
        Ok(SupplyStats::collect(
            &self.store.accounts()?,
            &self.store.lots()?,
        ))
    }

    /// Grant experience for primary currency spent and raise the level
    pub(crate) fn award_spend(&self, tx: &Txn<'_>, id: AccountId, spent: u64) -> TxResult<()> {
        let progression = &self.config.progression;
        let gained = Progression::experience_for_spend(spent, progression);
        if gained == 0 {
            return Ok(());
        }
        let mut account = tx.account(id)?;
        account.experience = account.experience.saturating_add(gained);
        account.level = account
            .level
            .max(Progression::level_for_experience(account.experience, progression));
        tx.put_account(&account)
    }
}
