//! Per-bank transaction queue with a blocking admission signal.
//!
//! The queue pairs a FIFO of pending transactions with a condition variable
//! acting as the admission signal: every enqueue wakes one blocked consumer,
//! and closing the queue wakes all of them so no worker blocks across
//! shutdown. Extraction order is FIFO by contract; the per-transaction
//! wait-time statistics assume it.

use crate::error::{Error, Result};
use bank_core::Transaction;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

#[derive(Debug, Default)]
struct Inner {
    pending: VecDeque<Transaction>,
    closed: bool,
}

/// FIFO work queue shared by one bank's generator and processor pool.
#[derive(Debug, Default)]
pub struct TransactionQueue {
    inner: Mutex<Inner>,
    admission: Condvar,
}

impl TransactionQueue {
    /// Create an empty, open queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transaction and raise the admission signal.
    ///
    /// Safe under multiple producers. Refused once the queue is closed.
    pub fn enqueue(&self, transaction: Transaction) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(Error::QueueClosed);
        }
        inner.pending.push_back(transaction);
        self.admission.notify_one();
        Ok(())
    }

    /// Block until a transaction is available and extract the oldest one.
    ///
    /// Returns `None` once the queue has been closed, the shutdown
    /// sentinel. Transactions still queued at close time stay queued: they
    /// form the pending population of the final report, and only work
    /// dequeued before the close is ever settled.
    pub fn dequeue_blocking(&self) -> Option<Transaction> {
        let mut inner = self.inner.lock();
        loop {
            if inner.closed {
                return None;
            }
            if let Some(transaction) = inner.pending.pop_front() {
                return Some(transaction);
            }
            self.admission.wait(&mut inner);
        }
    }

    /// Close the queue and wake every blocked consumer.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.closed = true;
        self.admission.notify_all();
    }

    /// Number of transactions still queued.
    pub fn len(&self) -> usize {
        self.inner.lock().pending.len()
    }

    /// Whether no transactions are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the queue has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }
}
