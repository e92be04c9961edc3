//! Farm Empire Storage Layer - sled-backed transactional store
//!
//! Designed around short read-validate-write transactions:
//! - Every mutation runs inside one sled transaction
//! - Conflicting transactions on the same records are retried by sled
//! - An aborted transaction leaves no partial writes behind
//!
//! The [`Ledger`] and [`AssetStore`] are thin handles over a shared
//! [`Store`]; composite operations elsewhere use [`Store::transact`] and
//! the `Txn` primitives directly so several steps commit as one unit.

pub mod assets;
pub mod keys;
pub mod ledger;
pub mod migrations;
pub mod store;

pub use assets::AssetStore;
pub use ledger::Ledger;
pub use migrations::SCHEMA_VERSION;
pub use store::{abort, lift, Store, TxResult, Txn};
