//! Currency ledger
//!
//! Balances only move through [`Txn::credit`], [`Txn::debit`] and
//! [`Txn::transfer`]. Each one re-reads the account inside the running
//! transaction, so two concurrent debits against the same balance are
//! serialized by sled and never both pass the funds check.

use farm_core::{Account, AccountId, Currency, EconomyError, Result};

use crate::store::{abort, Store, TxResult, Txn};

fn require_positive(amount: u64) -> TxResult<()> {
    if amount == 0 {
        return abort(EconomyError::validation("amount must be positive"));
    }
    Ok(())
}

impl Txn<'_> {
    /// Add `amount` to a balance. Returns the new balance.
    pub fn credit(&self, id: AccountId, currency: Currency, amount: u64) -> TxResult<u64> {
        require_positive(amount)?;
        let mut account = self.account(id)?;
        let balance = account.balance_mut(currency);
        *balance = match balance.checked_add(amount) {
            Some(total) => total,
            None => {
                return abort(EconomyError::validation(format!(
                    "{} balance overflow",
                    currency
                )))
            }
        };
        let updated = *balance;
        self.put_account(&account)?;
        Ok(updated)
    }

    /// Remove `amount` from a balance. Returns the new balance.
    pub fn debit(&self, id: AccountId, currency: Currency, amount: u64) -> TxResult<u64> {
        require_positive(amount)?;
        let mut account = self.account(id)?;
        let available = account.balance(currency);
        if available < amount {
            return abort(EconomyError::InsufficientFunds {
                currency,
                required: amount,
                available,
            });
        }
        *account.balance_mut(currency) = available - amount;
        self.put_account(&account)?;
        Ok(available - amount)
    }

    pub fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        currency: Currency,
        amount: u64,
    ) -> TxResult<()> {
        if from == to {
            return abort(EconomyError::validation("cannot transfer to the same account"));
        }
        self.debit(from, currency, amount)?;
        self.credit(to, currency, amount)?;
        Ok(())
    }
}

/// Standalone ledger operations, each committed as its own transaction
#[derive(Debug, Clone)]
pub struct Ledger {
    store: Store,
}

impl Ledger {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn balance(&self, id: AccountId, currency: Currency) -> Result<u64> {
        Ok(self.store.account(id)?.balance(currency))
    }

    pub fn credit(&self, id: AccountId, currency: Currency, amount: u64) -> Result<u64> {
        let balance = self.store.transact(|tx| tx.credit(id, currency, amount))?;
        log::debug!("Credited {} {} to account {}", amount, currency, id);
        Ok(balance)
    }

    pub fn debit(&self, id: AccountId, currency: Currency, amount: u64) -> Result<u64> {
        let balance = self.store.transact(|tx| tx.debit(id, currency, amount))?;
        log::debug!("Debited {} {} from account {}", amount, currency, id);
        Ok(balance)
    }

    pub fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        currency: Currency,
        amount: u64,
    ) -> Result<()> {
        self.store
            .transact(|tx| tx.transfer(from, to, currency, amount))?;
        log::debug!(
            "Transferred {} {} from account {} to {}",
            amount,
            currency,
            from,
            to
        );
        Ok(())
    }

    /// Sum of all balances in one currency
    pub fn total_supply(&self, currency: Currency) -> Result<u64> {
        Ok(self
            .store
            .accounts()?
            .iter()
            .map(|account: &Account| account.balance(currency))
            .sum())
    }
}
