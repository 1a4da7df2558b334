//! Error types for the bank core.

use crate::types::{AccountId, BankId};
use thiserror::Error;

/// Result type for bank-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Bank-core errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Amounts must be strictly positive
    #[error("non-positive amount: {0}")]
    NonPositiveAmount(i64),

    /// Withdrawal would breach the overdraft floor
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Amount the withdrawal asked for.
        requested: i64,
        /// Balance plus remaining overdraft headroom at refusal time.
        available: i64,
    },

    /// Account index outside the owning bank's account list
    #[error("unknown account: {0}")]
    UnknownAccount(AccountId),

    /// Bank not present in the registry
    #[error("unknown bank: {0}")]
    UnknownBank(BankId),
}
