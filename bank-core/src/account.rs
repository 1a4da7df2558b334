//! Client and reserve accounts.
//!
//! An account is a balance in integer minor units with an overdraft limit
//! and a withdraw-exclusivity lock. Withdrawals are compound: the caller
//! needs the overdraft usage of the withdrawal it just made (to charge the
//! fee) before another withdrawer may run, so [`Account::withdraw`] returns
//! a [`Withdrawal`] guard that keeps the lock held until dropped. Deposits
//! are a single atomic add and take no lock.

use crate::currency::Currency;
use crate::error::{Error, Result};
use crate::types::{AccountId, BankId};
use parking_lot::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicI64, Ordering};

/// A balance holder with an overdraft limit.
///
/// Created once at bank setup and mutated only through [`Account::withdraw`]
/// and [`Account::deposit`]. The overdraft floor `balance >=
/// -overdraft_limit` holds after every committed withdrawal.
#[derive(Debug)]
pub struct Account {
    id: AccountId,
    bank: BankId,
    currency: Currency,
    balance: AtomicI64,
    overdraft_limit: i64,
    withdraw_lock: Mutex<()>,
}

/// Receipt of a committed withdrawal.
///
/// Holds the account's withdraw-exclusivity lock; dropping the receipt
/// releases it, on every path. [`Withdrawal::overdraft_used`] is the portion
/// of this withdrawal that pushed the balance below zero; reading it while
/// the receipt lives is what makes "withdraw, then charge the overdraft fee"
/// atomic with respect to other withdrawers.
#[derive(Debug)]
pub struct Withdrawal<'a> {
    amount: i64,
    overdraft_used: i64,
    _lock: MutexGuard<'a, ()>,
}

impl Withdrawal<'_> {
    /// Amount withdrawn.
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Portion of the withdrawal funded from the overdraft region.
    pub fn overdraft_used(&self) -> i64 {
        self.overdraft_used
    }
}

impl Account {
    /// Create an account with an opening balance and overdraft limit.
    pub fn new(
        id: AccountId,
        bank: BankId,
        currency: Currency,
        balance: i64,
        overdraft_limit: i64,
    ) -> Self {
        debug_assert!(overdraft_limit >= 0, "overdraft limit must be non-negative");
        Self {
            id,
            bank,
            currency,
            balance: AtomicI64::new(balance),
            overdraft_limit,
            withdraw_lock: Mutex::new(()),
        }
    }

    /// Account ID within the owning bank.
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Owning bank.
    pub fn bank(&self) -> BankId {
        self.bank
    }

    /// Currency the balance is denominated in.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Current balance in minor units.
    pub fn balance(&self) -> i64 {
        self.balance.load(Ordering::Acquire)
    }

    /// Overdraft limit in minor units.
    pub fn overdraft_limit(&self) -> i64 {
        self.overdraft_limit
    }

    /// Withdraw `amount`, keeping the exclusivity lock held through the
    /// returned receipt.
    ///
    /// Fails without mutating if `amount` is non-positive or the withdrawal
    /// would leave the balance below `-overdraft_limit`; the lock is
    /// released on those paths too. Blocks while another withdrawer holds
    /// the lock.
    pub fn withdraw(&self, amount: i64) -> Result<Withdrawal<'_>> {
        if amount <= 0 {
            return Err(Error::NonPositiveAmount(amount));
        }
        let lock = self.withdraw_lock.lock();
        let balance = self.balance.load(Ordering::Acquire);
        if balance - amount < -self.overdraft_limit {
            return Err(Error::InsufficientFunds {
                requested: amount,
                available: balance + self.overdraft_limit,
            });
        }
        // Concurrent deposits only grow the balance, so the check above
        // stays valid between the load and the subtraction.
        let after = self.balance.fetch_sub(amount, Ordering::AcqRel) - amount;
        let overdraft_used = (-after).clamp(0, amount);
        Ok(Withdrawal {
            amount,
            overdraft_used,
            _lock: lock,
        })
    }

    /// Deposit `amount`. A single atomic add; does not take the withdraw
    /// lock.
    pub fn deposit(&self, amount: i64) -> Result<()> {
        if amount <= 0 {
            return Err(Error::NonPositiveAmount(amount));
        }
        self.balance.fetch_add(amount, Ordering::AcqRel);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::AtomicUsize;

    fn account(balance: i64, overdraft_limit: i64) -> Account {
        Account::new(
            AccountId::new(0),
            BankId::new(0),
            Currency::USD,
            balance,
            overdraft_limit,
        )
    }

    #[test]
    fn test_withdraw_refused_beyond_overdraft() {
        let account = account(1000, 0);
        let result = account.withdraw(1500);
        assert_eq!(
            result.err(),
            Some(Error::InsufficientFunds {
                requested: 1500,
                available: 1000,
            })
        );
        assert_eq!(account.balance(), 1000);
    }

    #[test]
    fn test_withdraw_into_overdraft_region() {
        let account = account(1000, 500);
        let receipt = account.withdraw(1200).unwrap();
        assert_eq!(receipt.amount(), 1200);
        assert_eq!(receipt.overdraft_used(), 200);
        drop(receipt);
        assert_eq!(account.balance(), -200);
    }

    #[test]
    fn test_withdraw_fully_within_balance_uses_no_overdraft() {
        let account = account(1000, 500);
        let receipt = account.withdraw(1000).unwrap();
        assert_eq!(receipt.overdraft_used(), 0);
    }

    #[test]
    fn test_withdraw_from_negative_balance_is_all_overdraft() {
        let account = account(-100, 500);
        let receipt = account.withdraw(100).unwrap();
        assert_eq!(receipt.overdraft_used(), 100);
        drop(receipt);
        assert_eq!(account.balance(), -200);
    }

    #[test]
    fn test_non_positive_amounts_refused() {
        let account = account(1000, 0);
        assert_eq!(account.withdraw(0).err(), Some(Error::NonPositiveAmount(0)));
        assert_eq!(
            account.deposit(-5).err(),
            Some(Error::NonPositiveAmount(-5))
        );
        assert_eq!(account.balance(), 1000);
    }

    #[test]
    fn test_lock_released_after_failed_withdrawal() {
        let account = account(100, 0);
        assert!(account.withdraw(200).is_err());
        // A refused withdrawal must not leave the lock held.
        assert!(account.withdraw(50).is_ok());
        assert_eq!(account.balance(), 50);
    }

    #[test]
    fn test_concurrent_withdrawals_respect_the_floor() {
        let account = account(100, 0);
        let successes = AtomicUsize::new(0);
        crossbeam::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|_| {
                    for _ in 0..50 {
                        if account.withdraw(1).is_ok() {
                            successes.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        })
        .unwrap();
        // 400 attempts against a balance of 100: exactly 100 may commit.
        assert_eq!(successes.load(Ordering::Relaxed), 100);
        assert_eq!(account.balance(), 0);
    }

    #[test]
    fn test_deposits_interleave_safely_with_withdrawals() {
        let account = account(0, 0);
        crossbeam::thread::scope(|scope| {
            scope.spawn(|_| {
                for _ in 0..1000 {
                    account.deposit(3).unwrap();
                }
            });
            scope.spawn(|_| {
                let mut taken = 0;
                while taken < 1000 {
                    if account.withdraw(1).is_ok() {
                        taken += 1;
                    }
                }
            });
        })
        .unwrap();
        assert_eq!(account.balance(), 3000 - 1000);
    }

    proptest! {
        #[test]
        fn prop_balance_never_breaches_overdraft_floor(
            ops in proptest::collection::vec((any::<bool>(), 1i64..5_000), 1..200)
        ) {
            let account = account(1_000, 500);
            for (is_deposit, amount) in ops {
                if is_deposit {
                    account.deposit(amount).unwrap();
                } else {
                    let _ = account.withdraw(amount);
                }
                prop_assert!(account.balance() >= -account.overdraft_limit());
            }
        }
    }
}
