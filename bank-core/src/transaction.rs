//! The transaction record exchanged between generator and processors.

use crate::currency::Currency;
use crate::types::{AccountRef, BankId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Settlement outcome of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Queued, not yet settled by a processor.
    Pending,
    /// Settled; funds reached the destination.
    Successful,
    /// Refused; never retried.
    Failed,
}

impl TransactionStatus {
    /// Whether the status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Successful | Self::Failed)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "PENDING",
            Self::Successful => "SUCCESSFUL",
            Self::Failed => "FAILED",
        };
        write!(f, "{label}")
    }
}

/// A money transfer between two accounts, possibly across banks.
///
/// Created by a generator, enqueued on the origin bank's queue, settled by
/// exactly one processor, and discarded once its outcome is folded into the
/// bank's statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID (UUIDv7 for time-ordering).
    pub id: Uuid,

    /// Source account; always owned by the bank whose queue holds the
    /// transaction.
    pub origin: AccountRef,

    /// Target account.
    pub destination: AccountRef,

    /// Amount in the origin bank's currency, minor units.
    pub amount: i64,

    /// Transfer currency: the destination bank's currency.
    pub currency: Currency,

    /// Exchange rate applied; set while an international transfer is
    /// processed.
    pub exchange_rate: Option<f64>,

    /// Settlement outcome; write-once terminal.
    status: TransactionStatus,

    /// Enqueue timestamp.
    pub created_at: DateTime<Utc>,

    /// Settlement timestamp; set together with the terminal status.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Create a pending transaction.
    pub fn new(
        origin: AccountRef,
        destination: AccountRef,
        amount: i64,
        currency: Currency,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            origin,
            destination,
            amount,
            currency,
            exchange_rate: None,
            status: TransactionStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Current status.
    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Record the terminal status, stamping `completed_at`. Called exactly
    /// once per processing attempt.
    pub fn mark_settled(&mut self, status: TransactionStatus) {
        debug_assert_eq!(
            self.status,
            TransactionStatus::Pending,
            "transaction settled twice"
        );
        debug_assert!(status.is_terminal());
        self.status = status;
        self.completed_at = Some(Utc::now());
    }

    /// Queue plus processing latency; zero until settled.
    pub fn wait_time(&self) -> chrono::Duration {
        match self.completed_at {
            Some(completed) => completed - self.created_at,
            None => chrono::Duration::zero(),
        }
    }

    /// Whether the destination belongs to `bank`.
    pub fn is_domestic(&self, bank: BankId) -> bool {
        self.destination.bank == bank
    }
}
