//! Error types for the settlement engine.

use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement engine errors
#[derive(Error, Debug)]
pub enum Error {
    /// Queue refused an enqueue after drain began
    #[error("transaction queue closed")]
    QueueClosed,

    /// Transaction refused at admission time
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A worker thread panicked instead of exiting cleanly
    #[error("worker thread panicked: {0}")]
    WorkerPanicked(String),

    /// Core banking error
    #[error(transparent)]
    Core(#[from] bank_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
