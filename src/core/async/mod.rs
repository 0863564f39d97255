//! Asynchronous implementations of core components
//!
//! This module provides thread-safe, concurrent implementations of the replay
//! components using DashMap for locking.
//!
//! # Architecture
//!
//! - **AsyncTransactionRegistry**: records locked per transaction ID
//! - **AsyncPartyLedger**: party totals locked per party
//! - **AsyncEscrowEngine**: applies commands against both
//! - **BatchProcessor**: runs per-record partitions of a batch on tokio tasks
//!
//! # Thread Safety
//!
//! Operations on different records proceed in parallel; operations on the
//! same record are serialized. There is no global lock.

pub mod batch_processor;
pub mod engine;
pub mod ledger;
pub mod registry;

pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use engine::AsyncEscrowEngine;
pub use ledger::AsyncPartyLedger;
pub use registry::AsyncTransactionRegistry;
