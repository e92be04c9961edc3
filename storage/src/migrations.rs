//! Versioned schema migrations
//!
//! Run once from [`Store::open`]. Each step is applied only when the stored
//! `meta:schema_version` is below its version, and the version record is
//! written right after the step succeeds. A failing step stops startup with
//! the error instead of being skipped.

use farm_core::{Account, AccountId, EconomyError, Farm, Holdings, Nft, Result};
use std::collections::BTreeMap;

use crate::keys;
use crate::store::Store;

struct Migration {
    version: u32,
    description: &'static str,
    apply: fn(&Store) -> Result<()>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "initial record layout",
        apply: initial_layout,
    },
    Migration {
        version: 2,
        description: "rebuild per-account holdings index",
        apply: rebuild_holdings,
    },
    Migration {
        version: 3,
        description: "backfill display id index",
        apply: backfill_display_ids,
    },
];

/// Latest schema version this build understands
pub const SCHEMA_VERSION: u32 = 3;

pub(crate) fn run(store: &Store) -> Result<()> {
    let current = store.schema_version()?;
    if current > SCHEMA_VERSION {
        return Err(EconomyError::Storage(format!(
            "database schema version {} is newer than supported version {}",
            current, SCHEMA_VERSION
        )));
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        log::info!(
            "Applying schema migration v{}: {}",
            migration.version,
            migration.description
        );
        (migration.apply)(store)?;
        store.write_raw(keys::SCHEMA_VERSION, &migration.version)?;
        store.flush()?;
    }
    Ok(())
}

fn initial_layout(store: &Store) -> Result<()> {
    for name in ["farm", "nft", "lot", "trade", "display", "buff"] {
        let key = keys::counter(name);
        if store.read::<u64>(&key)?.is_none() {
            store.write_raw(&key, &0u64)?;
        }
    }
    Ok(())
}

fn rebuild_holdings(store: &Store) -> Result<()> {
    let mut index: BTreeMap<AccountId, Holdings> = BTreeMap::new();
    for farm in store.scan::<Farm>(keys::FARM_PREFIX)? {
        index.entry(farm.owner).or_default().add_farm(farm.id);
    }
    for nft in store.scan::<Nft>(keys::NFT_PREFIX)? {
        index.entry(nft.owner).or_default().add_nft(nft.id);
    }
    for account in store.accounts()? {
        let holdings = index.remove(&account.id).unwrap_or_default();
        store.write_raw(&keys::holdings(account.id), &holdings)?;
    }
    if !index.is_empty() {
        log::warn!(
            "{} asset owner(s) have no account record",
            index.len()
        );
    }
    Ok(())
}

fn backfill_display_ids(store: &Store) -> Result<()> {
    let accounts: Vec<Account> = store.accounts()?;
    let mut highest = store.read::<u64>(&keys::counter("display"))?.unwrap_or(0);
    for account in &accounts {
        store.write_raw(&keys::display(account.display_id), &account.id)?;
        highest = highest.max(account.display_id);
    }
    store.write_raw(&keys::counter("display"), &highest)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_store_is_current() {
        let store = Store::temporary().unwrap();
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_rerun_is_noop() {
        let store = Store::temporary().unwrap();
        store
            .transact(|tx| tx.get_or_create_account(1, 200, 0, 0))
            .unwrap();
        run(&store).unwrap();
        assert_eq!(store.account(1).unwrap().primary, 200);
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_rebuild_holdings_from_records() {
        let store = Store::temporary().unwrap();
        store
            .transact(|tx| {
                tx.get_or_create_account(1, 200, 0, 0)?;
                tx.add_farm(1, "starter", 0)?;
                tx.add_nft(1, "doge", 0)
            })
            .unwrap();
        store
            .write_raw(&keys::holdings(1), &Holdings::default())
            .unwrap();
        store.write_raw(keys::SCHEMA_VERSION, &1u32).unwrap();

        run(&store).unwrap();

        let holdings: Holdings = store.read(&keys::holdings(1)).unwrap().unwrap();
        assert_eq!(holdings.farms.len(), 1);
        assert_eq!(holdings.nfts.len(), 1);
    }

    #[test]
    fn test_newer_schema_rejected() {
        let store = Store::temporary().unwrap();
        store
            .write_raw(keys::SCHEMA_VERSION, &(SCHEMA_VERSION + 1))
            .unwrap();
        assert!(matches!(run(&store), Err(EconomyError::Storage(_))));
    }
}
