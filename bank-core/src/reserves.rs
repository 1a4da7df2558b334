//! Per-currency reserve accounts.
//!
//! Each bank owns one reserve account per supported currency and routes a
//! cross-currency settlement through the reserve matching the destination
//! bank's currency. Reserves are indexed directly by currency, so adding a
//! currency never grows a branch list.

use crate::account::Account;
use crate::currency::Currency;
use crate::types::{AccountId, BankId};

/// One reserve account per supported currency, owned by a single bank.
///
/// Reserve accounts carry no overdraft: a settlement the reserve cannot
/// fund is refused, not financed.
#[derive(Debug)]
pub struct CurrencyReserves {
    accounts: [Account; Currency::COUNT],
}

impl CurrencyReserves {
    /// Create the reserve set for `bank`, seeding each currency's account
    /// with the balance produced by `seed`.
    pub fn new(bank: BankId, mut seed: impl FnMut(Currency) -> i64) -> Self {
        let mut next = 0;
        let accounts = Currency::ALL.map(|currency| {
            let account = Account::new(AccountId::new(next), bank, currency, seed(currency), 0);
            next += 1;
            account
        });
        Self { accounts }
    }

    /// Reserve account holding `currency`.
    pub fn account(&self, currency: Currency) -> &Account {
        &self.accounts[currency.index()]
    }

    /// Current balance of every reserve, in [`Currency::ALL`] order.
    pub fn balances(&self) -> impl Iterator<Item = (Currency, i64)> + '_ {
        self.accounts
            .iter()
            .map(|account| (account.currency(), account.balance()))
    }
}
