//! sled database handle and transaction wrapper

use farm_core::{
    Account, AccountId, AuctionLot, EconomyError, FarmTrade, GlobalBuff, Holdings, LotId,
    Result, TradeId,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::transaction::{ConflictableTransactionError, TransactionError, TransactionalTree};
use std::path::Path;

use crate::keys;
use crate::migrations;

/// Result type inside a transaction closure
pub type TxResult<T> = std::result::Result<T, ConflictableTransactionError<EconomyError>>;

/// Abort the running transaction, rolling back every write it made
pub fn abort<T>(err: EconomyError) -> TxResult<T> {
    Err(ConflictableTransactionError::Abort(err))
}

/// Turn a plain economy result into a transaction result, aborting on error
pub fn lift<T>(result: Result<T>) -> TxResult<T> {
    result.map_err(ConflictableTransactionError::Abort)
}

pub(crate) fn storage_error(err: sled::Error) -> EconomyError {
    EconomyError::Storage(err.to_string())
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| EconomyError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| EconomyError::Serialization(e.to_string()))
}

#[derive(Debug, Clone)]
pub struct Store {
    db: sled::Db,
    /// Flush to disk after every committed transaction
    durable: bool,
}

impl Store {
    /// Open or create the database and bring its schema up to date
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path.as_ref()).map_err(|e| {
            EconomyError::Storage(format!(
                "Failed to open database at {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let store = Self { db, durable: true };
        migrations::run(&store)?;
        Ok(store)
    }

    /// In-memory database removed on drop, for tests and dry runs
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(storage_error)?;
        let store = Self { db, durable: false };
        migrations::run(&store)?;
        Ok(store)
    }

    /// Run `f` as one serializable transaction.
    ///
    /// `f` may be invoked more than once when sled detects a conflicting
    /// concurrent transaction, so it must not have side effects outside
    /// the transaction.
    pub fn transact<F, R>(&self, f: F) -> Result<R>
    where
        F: Fn(&Txn<'_>) -> TxResult<R>,
    {
        let result = self
            .db
            .transaction(|tree| f(&Txn { tree }))
            .map_err(|e| match e {
                TransactionError::Abort(err) => err,
                TransactionError::Storage(err) => storage_error(err),
            })?;

        if self.durable {
            self.flush()?;
        }
        Ok(result)
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush().map(|_| ()).map_err(storage_error)
    }

    /// Point read outside any transaction
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.db.get(key.as_bytes()).map_err(storage_error)? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// All records under a key prefix, in key order
    pub fn scan<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>> {
        let mut records = Vec::new();
        for item in self.db.scan_prefix(prefix.as_bytes()) {
            let (_key, value) = item.map_err(storage_error)?;
            records.push(decode(&value)?);
        }
        Ok(records)
    }

    pub(crate) fn write_raw<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.db
            .insert(key.as_bytes(), encode(value)?)
            .map_err(storage_error)?;
        Ok(())
    }

    pub fn account(&self, id: AccountId) -> Result<Account> {
        self.read(&keys::account(id))?
            .ok_or(EconomyError::AccountNotFound(id))
    }

    pub fn accounts(&self) -> Result<Vec<Account>> {
        self.scan(keys::ACCOUNT_PREFIX)
    }

    pub fn account_by_display_id(&self, display_id: u64) -> Result<Option<Account>> {
        match self.read::<AccountId>(&keys::display(display_id))? {
            Some(id) => self.read(&keys::account(id)),
            None => Ok(None),
        }
    }

    pub fn lot(&self, id: LotId) -> Result<Option<AuctionLot>> {
        self.read(&keys::lot(id))
    }

    pub fn lots(&self) -> Result<Vec<AuctionLot>> {
        self.scan(keys::LOT_PREFIX)
    }

    pub fn trade(&self, id: TradeId) -> Result<Option<FarmTrade>> {
        self.read(&keys::trade(id))
    }

    pub fn trades(&self) -> Result<Vec<FarmTrade>> {
        self.scan(keys::TRADE_PREFIX)
    }

    pub fn buffs(&self) -> Result<Vec<GlobalBuff>> {
        Ok(self.read(keys::BUFFS)?.unwrap_or_default())
    }

    pub fn schema_version(&self) -> Result<u32> {
        Ok(self.read(keys::SCHEMA_VERSION)?.unwrap_or(0))
    }
}

/// Typed view of a running transaction
pub struct Txn<'a> {
    tree: &'a TransactionalTree,
}

impl<'a> Txn<'a> {
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> TxResult<Option<T>> {
        match self.tree.get(key.as_bytes())? {
            Some(bytes) => match decode(&bytes) {
                Ok(value) => Ok(Some(value)),
                Err(err) => abort(err),
            },
            None => Ok(None),
        }
    }

    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> TxResult<()> {
        let bytes = match encode(value) {
            Ok(bytes) => bytes,
            Err(err) => return abort(err),
        };
        self.tree.insert(key.as_bytes(), bytes)?;
        Ok(())
    }

    pub fn delete(&self, key: &str) -> TxResult<()> {
        self.tree.remove(key.as_bytes())?;
        Ok(())
    }

    /// Next value of a named sequence, starting at 1
    pub fn next_id(&self, name: &str) -> TxResult<u64> {
        let key = keys::counter(name);
        let next = self.get::<u64>(&key)?.unwrap_or(0) + 1;
        self.put(&key, &next)?;
        Ok(next)
    }

    // ==================== Accounts ====================

    pub fn find_account(&self, id: AccountId) -> TxResult<Option<Account>> {
        self.get(&keys::account(id))
    }

    pub fn account(&self, id: AccountId) -> TxResult<Account> {
        match self.find_account(id)? {
            Some(account) => Ok(account),
            None => abort(EconomyError::AccountNotFound(id)),
        }
    }

    pub fn put_account(&self, account: &Account) -> TxResult<()> {
        self.put(&keys::account(account.id), account)
    }

    /// Load an account, creating it with the starting grant on first use.
    /// Returns the account and whether it was just created.
    pub fn get_or_create_account(
        &self,
        id: AccountId,
        starting_primary: u64,
        starting_secondary: u64,
        now: i64,
    ) -> TxResult<(Account, bool)> {
        if let Some(account) = self.find_account(id)? {
            return Ok((account, false));
        }
        let display_id = self.next_id("display")?;
        let account = Account::new(id, display_id, starting_primary, starting_secondary, now);
        self.put_account(&account)?;
        self.put(&keys::display(display_id), &id)?;
        Ok((account, true))
    }

    pub fn holdings(&self, owner: AccountId) -> TxResult<Holdings> {
        Ok(self.get(&keys::holdings(owner))?.unwrap_or_default())
    }

    pub fn put_holdings(&self, owner: AccountId, holdings: &Holdings) -> TxResult<()> {
        self.put(&keys::holdings(owner), holdings)
    }

    // ==================== Lots, trades, buffs ====================

    pub fn find_lot(&self, id: LotId) -> TxResult<Option<AuctionLot>> {
        self.get(&keys::lot(id))
    }

    pub fn put_lot(&self, lot: &AuctionLot) -> TxResult<()> {
        self.put(&keys::lot(lot.id), lot)
    }

    pub fn find_trade(&self, id: TradeId) -> TxResult<Option<FarmTrade>> {
        self.get(&keys::trade(id))
    }

    pub fn put_trade(&self, trade: &FarmTrade) -> TxResult<()> {
        self.put(&keys::trade(trade.id), trade)
    }

    pub fn buffs(&self) -> TxResult<Vec<GlobalBuff>> {
        Ok(self.get(keys::BUFFS)?.unwrap_or_default())
    }

    pub fn put_buffs(&self, buffs: &Vec<GlobalBuff>) -> TxResult<()> {
        self.put(keys::BUFFS, buffs)
    }
}
