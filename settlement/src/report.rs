//! Read-only run summaries.
//!
//! Reports are snapshots of a bank's counters and balances, meaningful once
//! the bank has stopped. Wait-time averages divide by the unprocessed
//! population (pending plus failed) and guard the empty case.

use bank_core::{BankId, Currency};
use serde::Serialize;
use std::fmt;

/// Final statistics for one bank.
#[derive(Debug, Clone, Serialize)]
pub struct BankReport {
    /// Bank these statistics describe.
    pub bank: BankId,

    /// The bank's national currency.
    pub currency: Currency,

    /// Balance of each internal reserve account.
    pub reserve_balances: Vec<(Currency, i64)>,

    /// Settled same-bank transfers.
    pub national_count: u64,

    /// Settled cross-currency transfers.
    pub international_count: u64,

    /// Registered client accounts.
    pub account_count: usize,

    /// Aggregate balance across client accounts.
    pub client_balance_total: i64,

    /// Accrued exchange taxes and overdraft fees.
    pub profit: i64,

    /// Transactions still queued when the bank drained.
    pub pending_count: usize,

    /// Transactions that settled FAILED.
    pub failed_count: u64,

    /// Total queue-plus-processing latency across failed transactions, in
    /// milliseconds.
    pub total_wait_ms: u64,
}

impl BankReport {
    /// Unprocessed transactions: still pending plus failed.
    pub fn unprocessed(&self) -> u64 {
        self.pending_count as u64 + self.failed_count
    }

    /// Average wait across unprocessed transactions, in milliseconds.
    pub fn average_wait_ms(&self) -> f64 {
        let unprocessed = self.unprocessed();
        if unprocessed == 0 {
            0.0
        } else {
            self.total_wait_ms as f64 / unprocessed as f64
        }
    }
}

impl fmt::Display for BankReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Statistics for national bank {} ({}):", self.bank, self.currency)?;
        writeln!(f, "  reserve balances:")?;
        for (currency, balance) in &self.reserve_balances {
            writeln!(f, "    {currency} = {balance}")?;
        }
        writeln!(
            f,
            "  transfers: {} national, {} international",
            self.national_count, self.international_count
        )?;
        writeln!(
            f,
            "  client accounts: {} holding {} total",
            self.account_count, self.client_balance_total
        )?;
        writeln!(f, "  profit: {}", self.profit)?;
        writeln!(
            f,
            "  unprocessed: {} pending, {} failed",
            self.pending_count, self.failed_count
        )?;
        write!(f, "  average wait: {:.1} ms", self.average_wait_ms())
    }
}

/// Aggregate statistics across every bank in a run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Per-bank summaries, in bank-ID order.
    pub banks: Vec<BankReport>,
}

impl SimulationReport {
    /// Transactions no bank processed: pending plus failed, network-wide.
    pub fn total_unprocessed(&self) -> u64 {
        self.banks.iter().map(BankReport::unprocessed).sum()
    }

    /// Average wait across all unprocessed transactions, in milliseconds.
    pub fn average_wait_ms(&self) -> f64 {
        let unprocessed = self.total_unprocessed();
        if unprocessed == 0 {
            0.0
        } else {
            let total: u64 = self.banks.iter().map(|report| report.total_wait_ms).sum();
            total as f64 / unprocessed as f64
        }
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.banks {
            writeln!(f, "{report}")?;
            writeln!(f, "{}", "-".repeat(60))?;
        }
        writeln!(f, "Network totals:")?;
        writeln!(
            f,
            "  unprocessed transactions: {}",
            self.total_unprocessed()
        )?;
        write!(f, "  average wait: {:.1} ms", self.average_wait_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(pending: usize, failed: u64, total_wait_ms: u64) -> BankReport {
        BankReport {
            bank: BankId::new(0),
            currency: Currency::USD,
            reserve_balances: vec![(Currency::USD, 1_000)],
            national_count: 3,
            international_count: 2,
            account_count: 10,
            client_balance_total: 50_000,
            profit: 42,
            pending_count: pending,
            failed_count: failed,
            total_wait_ms,
        }
    }

    #[test]
    fn test_average_guards_zero_denominator() {
        let clean = report(0, 0, 0);
        assert_eq!(clean.unprocessed(), 0);
        assert_eq!(clean.average_wait_ms(), 0.0);
    }

    #[test]
    fn test_average_over_pending_and_failed() {
        let mixed = report(3, 2, 100);
        assert_eq!(mixed.unprocessed(), 5);
        assert_eq!(mixed.average_wait_ms(), 20.0);
    }

    #[test]
    fn test_network_totals() {
        let summary = SimulationReport {
            banks: vec![report(1, 1, 30), report(0, 3, 90)],
        };
        assert_eq!(summary.total_unprocessed(), 5);
        assert_eq!(summary.average_wait_ms(), 24.0);
    }

    #[test]
    fn test_display_renders_every_section() {
        let text = report(1, 2, 60).to_string();
        assert!(text.contains("bank-0"));
        assert!(text.contains("reserve balances"));
        assert!(text.contains("1 pending, 2 failed"));
        assert!(text.contains("average wait: 20.0 ms"));
    }
}
