//! InterPay Settlement Engine
//!
//! Concurrent transaction processing for a simulated network of national
//! banks. Each bank owns a FIFO queue of pending transactions, a pool of
//! payment-processor threads draining it, and per-currency reserve accounts
//! that fund cross-currency transfers.
//!
//! # Architecture
//!
//! 1. **Generation**: one generator thread per bank enqueues random
//!    transactions and raises the queue's admission signal
//! 2. **Settlement**: processor threads block on the signal, extract one
//!    transaction under the structural lock, and settle it against client
//!    accounts, reserves, and the bank's counters
//! 3. **Drain**: clearing the operating flag and closing the queue wakes
//!    every blocked worker; in-flight transactions finish, queued ones are
//!    reported as pending
//! 4. **Report**: after all threads join, each bank exposes a read-only
//!    summary of the run
//!
//! # Example
//!
//! ```no_run
//! use settlement::{Config, Simulation};
//!
//! fn main() -> settlement::Result<()> {
//!     let config = Config::default();
//!     let report = Simulation::new(config)?.run()?;
//!     println!("{} transactions left unprocessed", report.total_unprocessed());
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod bank;
pub mod config;
pub mod error;
pub mod generator;
pub mod processor;
pub mod queue;
pub mod registry;
pub mod report;
pub mod sim;

// Re-exports
pub use bank::Bank;
pub use config::Config;
pub use error::{Error, Result};
pub use generator::TransactionGenerator;
pub use processor::PaymentProcessor;
pub use queue::TransactionQueue;
pub use registry::BankRegistry;
pub use report::{BankReport, SimulationReport};
pub use sim::Simulation;
