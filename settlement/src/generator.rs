//! Transaction generator: one producer thread per bank.
//!
//! Generators read the registry to pick valid origin/destination pairs and
//! only ever construct transactions with in-range account indices; they
//! never touch balances.

use crate::bank::Bank;
use crate::error::Error;
use crate::registry::BankRegistry;
use bank_core::{AccountId, AccountRef, Transaction};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;

/// Randomized transaction producer for a single bank.
#[derive(Debug)]
pub struct TransactionGenerator {
    bank: Arc<Bank>,
    registry: Arc<BankRegistry>,
    rng: StdRng,
    time_unit: Duration,
    amount_range: (i64, i64),
}

impl TransactionGenerator {
    /// Create a generator; a `seed` of `None` draws from OS entropy.
    pub fn new(
        bank: Arc<Bank>,
        registry: Arc<BankRegistry>,
        seed: Option<u64>,
        time_unit: Duration,
        amount_range: (i64, i64),
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            bank,
            registry,
            rng,
            time_unit,
            amount_range,
        }
    }

    /// Produce transactions until the bank drains.
    pub fn run(mut self) {
        tracing::info!(bank = %self.bank.id(), "transaction generator started");
        while self.bank.is_operating() {
            let jitter = self.rng.gen_range(0..=3u32);
            std::thread::sleep(self.time_unit * jitter);
            if !self.bank.is_operating() {
                break;
            }
            let transaction = self.next_transaction();
            match self.bank.submit(transaction) {
                Ok(()) => {}
                Err(Error::QueueClosed) => break,
                Err(err) => {
                    tracing::error!(
                        bank = %self.bank.id(),
                        %err,
                        "transaction rejected at admission"
                    );
                }
            }
        }
        tracing::info!(bank = %self.bank.id(), "transaction generator stopped");
    }

    /// Construct a transaction whose indices are valid by construction.
    fn next_transaction(&mut self) -> Transaction {
        let origin_account = self.rng.gen_range(0..self.bank.accounts().len() as u32);
        let origin = AccountRef::new(self.bank.id(), AccountId::new(origin_account));

        let destination_bank = &self.registry.banks()[self.rng.gen_range(0..self.registry.len())];
        let destination_account =
            self.rng.gen_range(0..destination_bank.accounts().len() as u32);
        let destination =
            AccountRef::new(destination_bank.id(), AccountId::new(destination_account));

        let (min, max) = self.amount_range;
        let amount = self.rng.gen_range(min..=max);
        Transaction::new(origin, destination, amount, destination_bank.currency())
    }
}
