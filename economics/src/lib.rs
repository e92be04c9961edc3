//! Farm Empire Economics Module
//!
//! Pure calculations behind the economy. Nothing here touches storage;
//! callers read the records, run the numbers and write the results back
//! in one transaction.
//!
//! - Boost stacking from collectibles, level and global buffs
//! - Time-windowed farm accrual with activation caps
//! - Dynamic repeat-purchase and upgrade pricing
//! - Experience and account levels
//! - Secondary-currency drops
//! - Supply accounting

pub mod accrual;
pub mod boost;
pub mod drops;
pub mod pricing;
pub mod progression;
pub mod supply;

pub use accrual::{AccrualEngine, AccrualPlan, FarmAccrual};
pub use boost::BoostCalculator;
pub use drops::DropCalculator;
pub use pricing::PriceCalculator;
pub use progression::Progression;
pub use supply::SupplyStats;
