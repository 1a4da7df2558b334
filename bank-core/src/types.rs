//! Identifiers for banks and accounts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bank identifier, assigned densely from zero at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BankId(u32);

impl BankId {
    /// Create a bank ID.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Position in the registry's bank list.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bank-{}", self.0)
    }
}

/// Account identifier: the zero-based position in the owning bank's
/// account list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(u32);

impl AccountId {
    /// Create an account ID.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Position in the owning bank's account list.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "acct-{}", self.0)
    }
}

/// Global account address: owning bank plus position within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountRef {
    /// Owning bank.
    pub bank: BankId,
    /// Account within the owning bank.
    pub account: AccountId,
}

impl AccountRef {
    /// Create an account reference.
    pub const fn new(bank: BankId, account: AccountId) -> Self {
        Self { bank, account }
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bank, self.account)
    }
}
