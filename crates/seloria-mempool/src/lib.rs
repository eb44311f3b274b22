//! Seloria Mempool - Transaction pool
//!
//! This crate provides the transaction mempool for pending transactions.

pub mod ordering;
pub mod pool;

pub use ordering::{OrderingMode, TxPriority};
pub use pool::{Mempool, MempoolConfig, MempoolError, PendingTransaction};
