//! Economy error types

use thiserror::Error;

use crate::account::{AccountId, Currency};
use crate::asset::{FarmId, NftId};
use crate::lot::LotId;
use crate::trade::TradeId;

/// Coarse classification callers use to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InsufficientFunds,
    NotFound,
    InvalidState,
    Validation,
    /// Retry the whole operation once
    Conflict,
    /// Unexpected; report generically
    Storage,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EconomyError {
    #[error("Insufficient {currency} balance: required {required}, available {available}")]
    InsufficientFunds {
        currency: Currency,
        required: u64,
        available: u64,
    },

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Farm not found: {0}")]
    FarmNotFound(FarmId),

    #[error("Collectible not found: {0}")]
    NftNotFound(NftId),

    #[error("Trade not found: {0}")]
    TradeNotFound(TradeId),

    #[error("Unknown farm type: {0}")]
    UnknownFarmType(String),

    #[error("Unknown collectible type: {0}")]
    UnknownNftType(String),

    #[error("Unknown exchange pack: {0}")]
    UnknownPack(String),

    #[error("Unknown case: {0}")]
    UnknownCase(String),

    #[error("Auction not found or already ended: {0}")]
    AuctionNotFound(LotId),

    #[error("Auction {0} has already ended")]
    AuctionExpired(LotId),

    #[error("Bid too low: must be greater than {current}")]
    BidTooLow { current: u64 },

    #[error("Cannot bid on your own lot")]
    SelfBid,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl EconomyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EconomyError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            EconomyError::AccountNotFound(_)
            | EconomyError::FarmNotFound(_)
            | EconomyError::NftNotFound(_)
            | EconomyError::TradeNotFound(_)
            | EconomyError::UnknownFarmType(_)
            | EconomyError::UnknownNftType(_)
            | EconomyError::UnknownPack(_)
            | EconomyError::UnknownCase(_)
            | EconomyError::AuctionNotFound(_) => ErrorKind::NotFound,
            EconomyError::AuctionExpired(_)
            | EconomyError::SelfBid
            | EconomyError::InvalidState(_) => ErrorKind::InvalidState,
            EconomyError::BidTooLow { .. }
            | EconomyError::Validation(_)
            | EconomyError::Config(_) => ErrorKind::Validation,
            EconomyError::Conflict(_) => ErrorKind::Conflict,
            EconomyError::Storage(_) | EconomyError::Serialization(_) => ErrorKind::Storage,
        }
    }

    /// Expected business outcomes are recoverable; storage faults are not
    pub fn is_recoverable(&self) -> bool {
        self.kind() != ErrorKind::Storage
    }

    pub fn validation(message: impl Into<String>) -> Self {
        EconomyError::Validation(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        EconomyError::InvalidState(message.into())
    }
}

pub type Result<T> = std::result::Result<T, EconomyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = EconomyError::InsufficientFunds {
            currency: Currency::Primary,
            required: 60,
            available: 40,
        };
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
        assert!(err.is_recoverable());

        assert_eq!(EconomyError::AuctionNotFound(1).kind(), ErrorKind::NotFound);
        assert_eq!(EconomyError::AuctionExpired(1).kind(), ErrorKind::InvalidState);
        assert_eq!(
            EconomyError::BidTooLow { current: 5 }.kind(),
            ErrorKind::Validation
        );
        assert!(!EconomyError::Storage("disk full".into()).is_recoverable());
    }

    #[test]
    fn test_messages_are_distinct() {
        let low = EconomyError::BidTooLow { current: 700 }.to_string();
        let expired = EconomyError::AuctionExpired(3).to_string();

        assert_eq!(low, "Bid too low: must be greater than 700");
        assert_ne!(low, expired);
        assert_eq!(
            EconomyError::InsufficientFunds {
                currency: Currency::Secondary,
                required: 5,
                available: 1
            }
            .to_string(),
            "Insufficient secondary balance: required 5, available 1"
        );
    }
}
