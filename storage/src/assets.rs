//! Farm and collectible ownership
//!
//! Each account has a [`Holdings`] index listing the ids it owns. The index
//! is updated in the same transaction as the asset record itself, so
//! ownership lookups never need a table scan.

use farm_core::{AccountId, EconomyError, Farm, FarmId, Nft, NftId, Result};

use crate::keys;
use crate::store::{abort, Store, TxResult, Txn};

impl Txn<'_> {
    // ==================== Farms ====================

    pub fn find_farm(&self, id: FarmId) -> TxResult<Option<Farm>> {
        self.get(&keys::farm(id))
    }

    pub fn farm(&self, id: FarmId) -> TxResult<Farm> {
        match self.find_farm(id)? {
            Some(farm) => Ok(farm),
            None => abort(EconomyError::FarmNotFound(id)),
        }
    }

    pub fn put_farm(&self, farm: &Farm) -> TxResult<()> {
        self.put(&keys::farm(farm.id), farm)
    }

    /// Create a new farm for an existing account
    pub fn add_farm(&self, owner: AccountId, farm_type: &str, now: i64) -> TxResult<Farm> {
        self.account(owner)?;
        let id = self.next_id("farm")?;
        let farm = Farm::new(id, owner, farm_type, now);
        self.insert_farm(&farm)?;
        Ok(farm)
    }

    /// Store a farm record under its current owner, keeping its id and levels
    pub fn insert_farm(&self, farm: &Farm) -> TxResult<()> {
        self.account(farm.owner)?;
        let mut holdings = self.holdings(farm.owner)?;
        holdings.add_farm(farm.id);
        self.put_holdings(farm.owner, &holdings)?;
        self.put_farm(farm)
    }

    /// Detach a farm from its owner. Fails with `FarmNotFound` unless
    /// `expected_owner` currently owns it.
    pub fn remove_farm(&self, id: FarmId, expected_owner: AccountId) -> TxResult<Farm> {
        let farm = match self.find_farm(id)? {
            Some(farm) if farm.owner == expected_owner => farm,
            _ => return abort(EconomyError::FarmNotFound(id)),
        };
        let mut holdings = self.holdings(expected_owner)?;
        holdings.remove_farm(id);
        self.put_holdings(expected_owner, &holdings)?;
        self.delete(&keys::farm(id))?;
        Ok(farm)
    }

    pub fn reassign_farm(&self, id: FarmId, from: AccountId, to: AccountId) -> TxResult<Farm> {
        self.account(to)?;
        let mut farm = self.remove_farm(id, from)?;
        farm.owner = to;
        self.insert_farm(&farm)?;
        Ok(farm)
    }

    pub fn farms_of(&self, owner: AccountId) -> TxResult<Vec<Farm>> {
        let holdings = self.holdings(owner)?;
        let mut farms = Vec::with_capacity(holdings.farms.len());
        for id in holdings.farms {
            farms.push(self.farm(id)?);
        }
        Ok(farms)
    }

    pub fn count_farms_of_type(&self, owner: AccountId, farm_type: &str) -> TxResult<u32> {
        Ok(self
            .farms_of(owner)?
            .iter()
            .filter(|farm| farm.farm_type == farm_type)
            .count() as u32)
    }

    // ==================== Collectibles ====================

    pub fn find_nft(&self, id: NftId) -> TxResult<Option<Nft>> {
        self.get(&keys::nft(id))
    }

    pub fn nft(&self, id: NftId) -> TxResult<Nft> {
        match self.find_nft(id)? {
            Some(nft) => Ok(nft),
            None => abort(EconomyError::NftNotFound(id)),
        }
    }

    pub fn add_nft(&self, owner: AccountId, nft_type: &str, now: i64) -> TxResult<Nft> {
        self.account(owner)?;
        let id = self.next_id("nft")?;
        let nft = Nft::new(id, owner, nft_type, now);
        self.insert_nft(&nft)?;
        Ok(nft)
    }

    pub fn insert_nft(&self, nft: &Nft) -> TxResult<()> {
        self.account(nft.owner)?;
        let mut holdings = self.holdings(nft.owner)?;
        holdings.add_nft(nft.id);
        self.put_holdings(nft.owner, &holdings)?;
        self.put(&keys::nft(nft.id), nft)
    }

    pub fn remove_nft(&self, id: NftId, expected_owner: AccountId) -> TxResult<Nft> {
        let nft = match self.find_nft(id)? {
            Some(nft) if nft.owner == expected_owner => nft,
            _ => return abort(EconomyError::NftNotFound(id)),
        };
        let mut holdings = self.holdings(expected_owner)?;
        holdings.remove_nft(id);
        self.put_holdings(expected_owner, &holdings)?;
        self.delete(&keys::nft(id))?;
        Ok(nft)
    }

    pub fn reassign_nft(&self, id: NftId, from: AccountId, to: AccountId) -> TxResult<Nft> {
        self.account(to)?;
        let mut nft = self.remove_nft(id, from)?;
        nft.owner = to;
        self.insert_nft(&nft)?;
        Ok(nft)
    }

    pub fn nfts_of(&self, owner: AccountId) -> TxResult<Vec<Nft>> {
        let holdings = self.holdings(owner)?;
        let mut nfts = Vec::with_capacity(holdings.nfts.len());
        for id in holdings.nfts {
            nfts.push(self.nft(id)?);
        }
        Ok(nfts)
    }

    /// Units of a collectible type minted so far
    pub fn minted(&self, nft_type: &str) -> TxResult<u64> {
        Ok(self.get::<u64>(&keys::minted(nft_type))?.unwrap_or(0))
    }

    /// Count one more mint of a capped collectible type
    pub fn record_mint(&self, nft_type: &str, cap: Option<u64>) -> TxResult<u64> {
        let key = keys::minted(nft_type);
        let minted = self.minted(nft_type)?;
        if let Some(cap) = cap {
            if minted >= cap {
                return abort(EconomyError::invalid_state(format!(
                    "{} is sold out ({} of {} minted)",
                    nft_type, minted, cap
                )));
            }
        }
        self.put(&key, &(minted + 1))?;
        Ok(minted + 1)
    }
}

/// Standalone asset operations, each committed as its own transaction
#[derive(Debug, Clone)]
pub struct AssetStore {
    store: Store,
}

impl AssetStore {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn add_farm(&self, owner: AccountId, farm_type: &str, now: i64) -> Result<Farm> {
        self.store.transact(|tx| tx.add_farm(owner, farm_type, now))
    }

    pub fn remove_farm(&self, id: FarmId, expected_owner: AccountId) -> Result<Farm> {
        self.store.transact(|tx| tx.remove_farm(id, expected_owner))
    }

    pub fn reassign_farm(&self, id: FarmId, from: AccountId, to: AccountId) -> Result<Farm> {
        let farm = self.store.transact(|tx| tx.reassign_farm(id, from, to))?;
        log::debug!("Farm {} reassigned from {} to {}", id, from, to);
        Ok(farm)
    }

    pub fn add_nft(&self, owner: AccountId, nft_type: &str, now: i64) -> Result<Nft> {
        self.store.transact(|tx| tx.add_nft(owner, nft_type, now))
    }

    pub fn remove_nft(&self, id: NftId, expected_owner: AccountId) -> Result<Nft> {
        self.store.transact(|tx| tx.remove_nft(id, expected_owner))
    }

    pub fn reassign_nft(&self, id: NftId, from: AccountId, to: AccountId) -> Result<Nft> {
        let nft = self.store.transact(|tx| tx.reassign_nft(id, from, to))?;
        log::debug!("Collectible {} reassigned from {} to {}", id, from, to);
        Ok(nft)
    }

    /// Every farm and collectible owned by `owner`
    pub fn list_by_owner(&self, owner: AccountId) -> Result<(Vec<Farm>, Vec<Nft>)> {
        self.store
            .transact(|tx| Ok((tx.farms_of(owner)?, tx.nfts_of(owner)?)))
    }

    pub fn farms(&self) -> Result<Vec<Farm>> {
        self.store.scan(keys::FARM_PREFIX)
    }

    pub fn nfts(&self) -> Result<Vec<Nft>> {
        self.store.scan(keys::NFT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Store, AssetStore) {
        let store = Store::temporary().unwrap();
        for id in [1, 2] {
            store
                .transact(|tx| tx.get_or_create_account(id, 200, 0, 0))
                .unwrap();
        }
        let assets = AssetStore::new(store.clone());
        (store, assets)
    }

    #[test]
    fn test_add_and_list() {
        let (_store, assets) = setup();

        let a = assets.add_farm(1, "starter", 10).unwrap();
        let b = assets.add_farm(1, "wheat", 20).unwrap();
        assets.add_nft(1, "doge", 30).unwrap();
        assert_ne!(a.id, b.id);

        let (farms, nfts) = assets.list_by_owner(1).unwrap();
        assert_eq!(farms.len(), 2);
        assert_eq!(nfts.len(), 1);
        assert!(!farms[0].active);

        let (farms, nfts) = assets.list_by_owner(2).unwrap();
        assert!(farms.is_empty() && nfts.is_empty());
    }

    #[test]
    fn test_add_for_unknown_account() {
        let (_store, assets) = setup();
        assert_eq!(
            assets.add_farm(99, "starter", 0).unwrap_err(),
            EconomyError::AccountNotFound(99)
        );
    }

    #[test]
    fn test_remove_requires_owner() {
        let (_store, assets) = setup();
        let farm = assets.add_farm(1, "starter", 0).unwrap();

        assert_eq!(
            assets.remove_farm(farm.id, 2).unwrap_err(),
            EconomyError::FarmNotFound(farm.id)
        );
        assert_eq!(assets.list_by_owner(1).unwrap().0.len(), 1);

        let removed = assets.remove_farm(farm.id, 1).unwrap();
        assert_eq!(removed.id, farm.id);
        assert!(assets.list_by_owner(1).unwrap().0.is_empty());
        assert!(assets.farms().unwrap().is_empty());
    }

    #[test]
    fn test_reassign_checks_current_owner() {
        let (_store, assets) = setup();
        let nft = assets.add_nft(1, "doge", 0).unwrap();

        assert_eq!(
            assets.reassign_nft(nft.id, 2, 1).unwrap_err(),
            EconomyError::NftNotFound(nft.id)
        );

        let moved = assets.reassign_nft(nft.id, 1, 2).unwrap();
        assert_eq!(moved.owner, 2);
        assert!(assets.list_by_owner(1).unwrap().1.is_empty());
        assert_eq!(assets.list_by_owner(2).unwrap().1[0].id, nft.id);
    }

    #[test]
    fn test_reassign_to_unknown_account_leaves_owner() {
        let (_store, assets) = setup();
        let nft = assets.add_nft(1, "doge", 0).unwrap();

        assert_eq!(
            assets.reassign_nft(nft.id, 1, 99).unwrap_err(),
            EconomyError::AccountNotFound(99)
        );
        assert_eq!(assets.list_by_owner(1).unwrap().1.len(), 1);
    }

    #[test]
    fn test_reassign_keeps_upgrade_levels() {
        let (store, assets) = setup();
        let mut farm = assets.add_farm(1, "wheat", 0).unwrap();
        farm.speed_level = 4;
        store.transact(|tx| tx.put_farm(&farm)).unwrap();

        let moved = assets.reassign_farm(farm.id, 1, 2).unwrap();
        assert_eq!(moved.speed_level, 4);
        assert_eq!(moved.owner, 2);
    }

    #[test]
    fn test_mint_cap() {
        let (store, _assets) = setup();

        assert_eq!(store.transact(|tx| tx.record_mint("crown", Some(2))).unwrap(), 1);
        assert_eq!(store.transact(|tx| tx.record_mint("crown", Some(2))).unwrap(), 2);
        assert!(matches!(
            store.transact(|tx| tx.record_mint("crown", Some(2))),
            Err(EconomyError::InvalidState(_))
        ));
        assert_eq!(store.transact(|tx| tx.record_mint("doge", None)).unwrap(), 1);
    }
}
