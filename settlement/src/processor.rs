//! Payment processor: a worker thread settling one bank's transactions.
//!
//! Several processors share a bank's queue. Each blocks on the admission
//! signal, extracts one transaction, settles it against one or two accounts
//! plus the bank's counters, and reports the outcome. Domain failures
//! become a FAILED status; they are never thrown up the stack and never
//! retried.

use crate::bank::Bank;
use crate::registry::BankRegistry;
use bank_core::{exchange_rate, Transaction, TransactionStatus};
use std::sync::Arc;
use std::time::Duration;

/// Fee on the overdraft-funded portion of a withdrawal, in percent.
const OVERDRAFT_FEE_PCT: i64 = 5;

/// Tax on the converted amount of an international transfer, in percent.
const TRANSFER_TAX_PCT: i64 = 1;

/// One worker in a bank's settlement pool.
#[derive(Debug)]
pub struct PaymentProcessor {
    id: usize,
    bank: Arc<Bank>,
    registry: Arc<BankRegistry>,
    delay: Duration,
}

impl PaymentProcessor {
    /// Create a processor draining `bank`'s queue.
    ///
    /// `delay` is the simulated settlement latency applied after each
    /// transaction; no lock is held while sleeping.
    pub fn new(id: usize, bank: Arc<Bank>, registry: Arc<BankRegistry>, delay: Duration) -> Self {
        Self {
            id,
            bank,
            registry,
            delay,
        }
    }

    /// Drain the bank's queue until the shutdown sentinel arrives.
    ///
    /// A transaction pulled before drain began is always finished, never
    /// abandoned.
    pub fn run(&self) {
        tracing::info!(
            processor = self.id,
            bank = %self.bank.id(),
            "payment processor started"
        );
        while self.bank.is_operating() {
            let Some(mut transaction) = self.bank.queue().dequeue_blocking() else {
                break;
            };
            let status = self.settle(&mut transaction);
            tracing::debug!(
                processor = self.id,
                bank = %self.bank.id(),
                transaction = %transaction.id,
                %status,
                "transaction finished"
            );
        }
        tracing::info!(
            processor = self.id,
            bank = %self.bank.id(),
            "payment processor stopped"
        );
    }

    /// Settle one transaction against accounts, reserves, and counters.
    ///
    /// Returns the terminal status, which is also recorded on the
    /// transaction together with its completion timestamp.
    pub fn settle(&self, transaction: &mut Transaction) -> TransactionStatus {
        let status = if transaction.is_domestic(self.bank.id()) {
            self.settle_domestic(transaction)
        } else {
            self.settle_international(transaction)
        };
        transaction.mark_settled(status);
        if status == TransactionStatus::Failed {
            let wait_ms = transaction.wait_time().num_milliseconds().max(0) as u64;
            self.bank.record_failure(wait_ms);
        }
        // Simulated settlement latency.
        std::thread::sleep(self.delay);
        status
    }

    /// Same-bank transfer: withdraw from origin, charge the overdraft fee,
    /// deposit the fee-adjusted amount into the destination.
    fn settle_domestic(&self, transaction: &Transaction) -> TransactionStatus {
        let Some(origin) = self.bank.account(transaction.origin.account) else {
            tracing::error!(
                transaction = %transaction.id,
                origin = %transaction.origin,
                "origin account missing despite admission check"
            );
            return TransactionStatus::Failed;
        };
        let Some(destination) = self.bank.account(transaction.destination.account) else {
            tracing::error!(
                transaction = %transaction.id,
                destination = %transaction.destination,
                "domestic destination account missing"
            );
            return TransactionStatus::Failed;
        };

        let fee = match origin.withdraw(transaction.amount) {
            Ok(receipt) => {
                // The fee must come from this exact withdrawal; the receipt
                // holds the account lock until it drops at the end of this
                // arm.
                let fee = receipt.overdraft_used() * OVERDRAFT_FEE_PCT / 100;
                if fee > 0 {
                    self.bank.add_profit(fee);
                }
                fee
            }
            Err(err) => {
                tracing::debug!(
                    transaction = %transaction.id,
                    %err,
                    "domestic withdrawal refused"
                );
                return TransactionStatus::Failed;
            }
        };

        if let Err(err) = destination.deposit(transaction.amount - fee) {
            tracing::error!(
                transaction = %transaction.id,
                %err,
                "domestic deposit refused"
            );
            return TransactionStatus::Failed;
        }
        self.bank.record_national();
        TransactionStatus::Successful
    }

    /// Cross-currency transfer: withdraw from origin, convert, bounce the
    /// converted amount through the reserve for the destination currency,
    /// deposit into the destination account.
    ///
    /// Profit (the 1% transfer tax plus any overdraft fee) accrues only
    /// once the transfer settles. A reserve refusal leaves the origin
    /// debited: partial application is the documented failure mode.
    fn settle_international(&self, transaction: &mut Transaction) -> TransactionStatus {
        let Some(origin) = self.bank.account(transaction.origin.account) else {
            tracing::error!(
                transaction = %transaction.id,
                origin = %transaction.origin,
                "origin account missing despite admission check"
            );
            return TransactionStatus::Failed;
        };
        let Some(destination_bank) = self.registry.bank(transaction.destination.bank) else {
            tracing::error!(
                transaction = %transaction.id,
                destination = %transaction.destination,
                "destination bank not registered"
            );
            return TransactionStatus::Failed;
        };
        let Some(destination) = destination_bank.account(transaction.destination.account) else {
            tracing::error!(
                transaction = %transaction.id,
                destination = %transaction.destination,
                "destination account missing"
            );
            return TransactionStatus::Failed;
        };

        let rate = exchange_rate(self.bank.currency(), transaction.currency);
        transaction.exchange_rate = Some(rate);
        let transfer_amount = (transaction.amount as f64 * rate).round() as i64;
        if transfer_amount <= 0 {
            tracing::debug!(
                transaction = %transaction.id,
                rate,
                "converted amount rounds to zero"
            );
            return TransactionStatus::Failed;
        }
        let tax = transfer_amount * TRANSFER_TAX_PCT / 100;

        let overdraft_fee = match origin.withdraw(transaction.amount) {
            Ok(receipt) => receipt.overdraft_used() * OVERDRAFT_FEE_PCT / 100,
            Err(err) => {
                tracing::debug!(
                    transaction = %transaction.id,
                    %err,
                    "international withdrawal refused"
                );
                return TransactionStatus::Failed;
            }
        };

        // Bounce through the reserve holding the destination currency: the
        // deposit-withdraw pair proves the reserve can fund the transfer.
        let reserve = self.bank.reserves().account(transaction.currency);
        if let Err(err) = reserve.deposit(transfer_amount) {
            tracing::error!(
                transaction = %transaction.id,
                %err,
                "reserve deposit refused"
            );
            return TransactionStatus::Failed;
        }
        if let Err(err) = reserve.withdraw(transfer_amount) {
            tracing::debug!(
                transaction = %transaction.id,
                %err,
                "reserve cannot fund transfer"
            );
            return TransactionStatus::Failed;
        }

        if let Err(err) = destination.deposit(transfer_amount) {
            tracing::error!(
                transaction = %transaction.id,
                %err,
                "destination deposit refused"
            );
            return TransactionStatus::Failed;
        }

        self.bank.add_profit(tax + overdraft_fee);
        self.bank.record_international();
        TransactionStatus::Successful
    }

    /// Bank this processor settles for.
    pub fn bank(&self) -> &Arc<Bank> {
        &self.bank
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bank_core::{AccountId, AccountRef, BankId, Currency};

    /// Two-bank world: bank 0 in USD, bank 1 in EUR, two accounts each.
    fn world(reserve_seed: i64) -> Arc<BankRegistry> {
        let banks = [Currency::USD, Currency::EUR]
            .into_iter()
            .enumerate()
            .map(|(index, currency)| {
                let mut bank = Bank::new(BankId::new(index as u32), currency, |_| reserve_seed);
                bank.new_account(1_000, 0);
                bank.new_account(1_000, 500);
                bank
            })
            .collect();
        Arc::new(BankRegistry::new(banks))
    }

    fn processor(registry: &Arc<BankRegistry>, bank: u32) -> PaymentProcessor {
        let bank = Arc::clone(registry.bank(BankId::new(bank)).unwrap());
        PaymentProcessor::new(0, bank, Arc::clone(registry), Duration::ZERO)
    }

    fn transfer(origin: (u32, u32), destination: (u32, u32), amount: i64) -> Transaction {
        Transaction::new(
            AccountRef::new(BankId::new(origin.0), AccountId::new(origin.1)),
            AccountRef::new(BankId::new(destination.0), AccountId::new(destination.1)),
            amount,
            Currency::ALL[destination.0 as usize],
        )
    }

    #[test]
    fn test_domestic_transfer_conserves_money() {
        let registry = world(1_000_000);
        let processor = processor(&registry, 0);
        let bank = processor.bank();

        let mut tx = transfer((0, 0), (0, 1), 400);
        assert_eq!(processor.settle(&mut tx), TransactionStatus::Successful);

        assert_eq!(bank.account(AccountId::new(0)).unwrap().balance(), 600);
        assert_eq!(bank.account(AccountId::new(1)).unwrap().balance(), 1_400);
        assert_eq!(bank.national_count(), 1);
        assert_eq!(bank.profit(), 0);
        assert_eq!(tx.status(), TransactionStatus::Successful);
    }

    #[test]
    fn test_domestic_overdraft_charges_fee() {
        let registry = world(1_000_000);
        let processor = processor(&registry, 0);
        let bank = processor.bank();

        // Account 1: balance 1000, overdraft 500. Withdrawing 1200 uses 200
        // of overdraft, so the fee is 200 * 5% = 10.
        let mut tx = transfer((0, 1), (0, 0), 1_200);
        assert_eq!(processor.settle(&mut tx), TransactionStatus::Successful);

        assert_eq!(bank.account(AccountId::new(1)).unwrap().balance(), -200);
        assert_eq!(bank.profit(), 10);
        // The destination receives the fee-adjusted amount.
        assert_eq!(
            bank.account(AccountId::new(0)).unwrap().balance(),
            1_000 + 1_200 - 10
        );
    }

    #[test]
    fn test_domestic_insufficient_funds_fails() {
        let registry = world(1_000_000);
        let processor = processor(&registry, 0);
        let bank = processor.bank();

        let mut tx = transfer((0, 0), (0, 1), 1_500);
        assert_eq!(processor.settle(&mut tx), TransactionStatus::Failed);

        assert_eq!(bank.account(AccountId::new(0)).unwrap().balance(), 1_000);
        assert_eq!(bank.account(AccountId::new(1)).unwrap().balance(), 1_000);
        assert_eq!(bank.failed_count(), 1);
        assert_eq!(bank.national_count(), 0);
        assert_eq!(bank.profit(), 0);
        assert_eq!(tx.status(), TransactionStatus::Failed);
    }

    #[test]
    fn test_international_transfer_converts_and_taxes() {
        let registry = world(1_000_000);
        let processor = processor(&registry, 0);
        let bank = processor.bank();
        let destination_bank = registry.bank(BankId::new(1)).unwrap();

        let amount = 1_000;
        let mut tx = transfer((0, 0), (1, 0), amount);
        assert_eq!(processor.settle(&mut tx), TransactionStatus::Successful);

        let rate = exchange_rate(Currency::USD, Currency::EUR);
        let expected_transfer = (amount as f64 * rate).round() as i64;
        let expected_tax = expected_transfer / 100;

        assert_eq!(tx.exchange_rate, Some(rate));
        assert_eq!(bank.account(AccountId::new(0)).unwrap().balance(), 0);
        assert_eq!(
            destination_bank.account(AccountId::new(0)).unwrap().balance(),
            1_000 + expected_transfer
        );
        // The bounce leaves the reserve where it started.
        assert_eq!(
            bank.reserves().account(Currency::EUR).balance(),
            1_000_000
        );
        assert_eq!(bank.profit(), expected_tax);
        assert_eq!(bank.international_count(), 1);
    }

    #[test]
    fn test_international_overdraft_adds_fee_to_tax() {
        let registry = world(1_000_000);
        let processor = processor(&registry, 0);
        let bank = processor.bank();

        // Account 1: balance 1000, overdraft 500 → 200 overdraft used.
        let amount = 1_200;
        let mut tx = transfer((0, 1), (1, 0), amount);
        assert_eq!(processor.settle(&mut tx), TransactionStatus::Successful);

        let rate = exchange_rate(Currency::USD, Currency::EUR);
        let expected_transfer = (amount as f64 * rate).round() as i64;
        let expected_tax = expected_transfer / 100;
        assert_eq!(bank.profit(), expected_tax + 10);
    }

    #[test]
    fn test_overdrawn_reserve_fails_settlement_without_profit() {
        // An overdrawn reserve cannot fund the bounce-back withdrawal.
        let registry = world(-10_000_000);
        let processor = processor(&registry, 0);
        let bank = processor.bank();
        let destination_bank = registry.bank(BankId::new(1)).unwrap();

        let mut tx = transfer((0, 0), (1, 0), 1_000);
        assert_eq!(processor.settle(&mut tx), TransactionStatus::Failed);

        // Partial application: the origin stays debited, nothing arrives.
        assert_eq!(bank.account(AccountId::new(0)).unwrap().balance(), 0);
        assert_eq!(
            destination_bank.account(AccountId::new(0)).unwrap().balance(),
            1_000
        );
        assert_eq!(bank.profit(), 0);
        assert_eq!(bank.failed_count(), 1);
        assert_eq!(bank.international_count(), 0);
    }

    #[test]
    fn test_international_insufficient_origin_fails_clean() {
        let registry = world(1_000_000);
        let processor = processor(&registry, 0);
        let bank = processor.bank();

        let mut tx = transfer((0, 0), (1, 1), 5_000);
        assert_eq!(processor.settle(&mut tx), TransactionStatus::Failed);

        assert_eq!(bank.account(AccountId::new(0)).unwrap().balance(), 1_000);
        assert_eq!(bank.profit(), 0);
        assert_eq!(bank.failed_count(), 1);
    }

    #[test]
    fn test_counters_partition_settled_transactions() {
        let registry = world(1_000_000);
        let processor = processor(&registry, 0);
        let bank = processor.bank();

        let mut settled = 0;
        for tx in [
            transfer((0, 0), (0, 1), 100),   // national
            transfer((0, 0), (1, 0), 100),   // international
            transfer((0, 0), (0, 1), 9_999), // fails: insufficient funds
        ] {
            let mut tx = tx;
            processor.settle(&mut tx);
            settled += 1;
            assert!(tx.status().is_terminal());
        }

        assert_eq!(
            bank.national_count() + bank.international_count() + bank.failed_count(),
            settled
        );
    }
}
