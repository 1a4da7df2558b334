//! InterPay Bank Core
//!
//! Domain leaves of the interbank payment simulator: currencies and the
//! exchange-rate table, accounts with overdraft limits and withdraw
//! exclusivity, per-currency reserve sets, and the transaction record.
//!
//! # Invariants
//!
//! - Overdraft floor: `balance >= -overdraft_limit` after every committed
//!   withdrawal
//! - Withdraw exclusivity: at most one withdrawal in progress per account,
//!   held until the caller drops the returned [`Withdrawal`] guard
//! - Write-once settlement: a transaction reaches a terminal status exactly
//!   once per processing attempt

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod account;
pub mod currency;
pub mod error;
pub mod reserves;
pub mod transaction;
pub mod types;

// Re-exports
pub use account::{Account, Withdrawal};
pub use currency::{exchange_rate, Currency};
pub use error::{Error, Result};
pub use reserves::CurrencyReserves;
pub use transaction::{Transaction, TransactionStatus};
pub use types::{AccountId, AccountRef, BankId};
