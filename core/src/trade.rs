//! Direct farm trade offers between two accounts

use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::asset::FarmId;

pub type TradeId = u64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TradeStatus {
    Pending,
    Accepted,
    Declined,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FarmTrade {
    pub id: TradeId,
    pub seller: AccountId,
    pub buyer: AccountId,
    pub farm_id: FarmId,
    /// Primary currency the buyer pays the seller
    pub price: u64,
    pub status: TradeStatus,
    pub created_at: i64,
}
