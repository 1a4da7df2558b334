//! A national bank: client accounts, reserves, the pending-transaction
//! queue, and shared run statistics.

use crate::error::{Error, Result};
use crate::queue::TransactionQueue;
use crate::report::BankReport;
use bank_core::{Account, AccountId, BankId, Currency, CurrencyReserves, Transaction};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};

/// A national bank and its shared run state.
///
/// Accounts and reserves are created during setup; once the bank is shared
/// with worker threads, only the queue, the counters, and account balances
/// mutate. Counters are monotone while the bank operates; after
/// [`Bank::begin_drain`] no new settlements start, and in-flight
/// transactions are the last writers.
#[derive(Debug)]
pub struct Bank {
    id: BankId,
    currency: Currency,
    accounts: Vec<Account>,
    reserves: CurrencyReserves,
    queue: TransactionQueue,
    operating: AtomicBool,
    national_count: AtomicU64,
    international_count: AtomicU64,
    failed_count: AtomicU64,
    profit: AtomicI64,
    total_wait_ms: AtomicU64,
}

impl Bank {
    /// Create a bank whose reserve accounts are seeded by `seed`.
    pub fn new(id: BankId, currency: Currency, seed: impl FnMut(Currency) -> i64) -> Self {
        Self {
            id,
            currency,
            accounts: Vec::new(),
            reserves: CurrencyReserves::new(id, seed),
            queue: TransactionQueue::new(),
            operating: AtomicBool::new(true),
            national_count: AtomicU64::new(0),
            international_count: AtomicU64::new(0),
            failed_count: AtomicU64::new(0),
            profit: AtomicI64::new(0),
            total_wait_ms: AtomicU64::new(0),
        }
    }

    /// Open a client account; setup phase only.
    pub fn new_account(&mut self, balance: i64, overdraft_limit: i64) -> AccountId {
        let id = AccountId::new(self.accounts.len() as u32);
        self.accounts.push(Account::new(
            id,
            self.id,
            self.currency,
            balance,
            overdraft_limit,
        ));
        id
    }

    /// Bank ID.
    pub fn id(&self) -> BankId {
        self.id
    }

    /// National currency of every client account.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Client account by ID.
    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(id.index())
    }

    /// All client accounts, in ID order.
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// The bank's internal currency reserves.
    pub fn reserves(&self) -> &CurrencyReserves {
        &self.reserves
    }

    /// The bank's pending-transaction queue.
    pub fn queue(&self) -> &TransactionQueue {
        &self.queue
    }

    /// Validate and enqueue a transaction, raising the admission signal.
    ///
    /// Malformed transactions (wrong origin bank, out-of-range origin
    /// account, non-positive amount) are rejected here and never reach a
    /// processor. Destination validity is the submitter's contract, checked
    /// against the registry at construction time.
    pub fn submit(&self, transaction: Transaction) -> Result<()> {
        if transaction.origin.bank != self.id {
            return Err(Error::InvalidTransaction(format!(
                "origin {} does not belong to {}",
                transaction.origin, self.id
            )));
        }
        if self.account(transaction.origin.account).is_none() {
            return Err(Error::InvalidTransaction(format!(
                "unknown origin account {}",
                transaction.origin
            )));
        }
        if transaction.amount <= 0 {
            return Err(Error::InvalidTransaction(format!(
                "non-positive amount {}",
                transaction.amount
            )));
        }
        self.queue.enqueue(transaction)
    }

    /// Whether the bank still accepts and settles new work.
    pub fn is_operating(&self) -> bool {
        self.operating.load(Ordering::Acquire)
    }

    /// Enter the draining state: stop accepting new work.
    ///
    /// Clearing the flag alone does not wake workers blocked on the
    /// admission signal; shutdown also closes the queue once generators
    /// have stopped.
    pub fn begin_drain(&self) {
        self.operating.store(false, Ordering::Release);
    }

    /// Record a settled same-bank transfer.
    pub fn record_national(&self) {
        self.national_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a settled cross-currency transfer.
    pub fn record_international(&self) {
        self.international_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed transaction, folding its queue-plus-processing
    /// latency into the wait-time statistics.
    pub fn record_failure(&self, wait_ms: u64) {
        self.failed_count.fetch_add(1, Ordering::Relaxed);
        self.total_wait_ms.fetch_add(wait_ms, Ordering::Relaxed);
    }

    /// Credit fees and taxes to the bank's profit.
    pub fn add_profit(&self, amount: i64) {
        self.profit.fetch_add(amount, Ordering::Relaxed);
    }

    /// Settled same-bank transfers so far.
    pub fn national_count(&self) -> u64 {
        self.national_count.load(Ordering::Relaxed)
    }

    /// Settled cross-currency transfers so far.
    pub fn international_count(&self) -> u64 {
        self.international_count.load(Ordering::Relaxed)
    }

    /// Failed transactions so far.
    pub fn failed_count(&self) -> u64 {
        self.failed_count.load(Ordering::Relaxed)
    }

    /// Accrued profit: exchange taxes plus overdraft fees.
    pub fn profit(&self) -> i64 {
        self.profit.load(Ordering::Relaxed)
    }

    /// Aggregate balance across all client accounts.
    pub fn client_balance_total(&self) -> i64 {
        self.accounts.iter().map(Account::balance).sum()
    }

    /// Read-only summary of the run; stable once the bank has stopped.
    pub fn report(&self) -> BankReport {
        BankReport {
            bank: self.id,
            currency: self.currency,
            reserve_balances: self.reserves.balances().collect(),
            national_count: self.national_count(),
            international_count: self.international_count(),
            account_count: self.accounts.len(),
            client_balance_total: self.client_balance_total(),
            profit: self.profit(),
            pending_count: self.queue.len(),
            failed_count: self.failed_count(),
            total_wait_ms: self.total_wait_ms.load(Ordering::Relaxed),
        }
    }
}
