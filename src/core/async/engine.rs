//! Command processing orchestration for async batch processing
//!
//! This module provides the `AsyncEscrowEngine` struct, which applies commands
//! using the thread-safe `AsyncTransactionRegistry` and `AsyncPartyLedger`.
//!
//! # Architecture
//!
//! ```text
//! AsyncEscrowEngine
//!     ├── Arc<AsyncTransactionRegistry>  (thread-safe records)
//!     ├── Arc<AsyncPartyLedger>          (thread-safe party totals)
//!     └── Option<Arc<Catalog>>           (rating tallies, optional)
//! ```
//!
//! # Thread Safety
//!
//! The engine is cheap to clone and can be shared across async tasks. Every
//! command routes through the same dispatcher as the single-threaded engine,
//! so both produce identical records for the same per-record command order.
use std::sync::Arc;

use tracing::debug;

use crate::core::catalog::Catalog;
use crate::core::engine::{apply_action, LedgerSnapshot};
use crate::core::traits::Settlement;
use crate::types::{Action, EscrowCommand, EscrowError, TransactionRecord};

use super::{AsyncPartyLedger, AsyncTransactionRegistry};

/// Command processor for async batch processing
#[derive(Debug, Clone)]
pub struct AsyncEscrowEngine {
    /// Records, locked per transaction ID
    registry: Arc<AsyncTransactionRegistry>,

    /// Party totals, locked per party
    ledger: Arc<AsyncPartyLedger>,

    /// Rating tallies, locked per book
    catalog: Option<Arc<Catalog>>,
}

impl AsyncEscrowEngine {
    /// Create a new AsyncEscrowEngine over shared components
    pub fn new(registry: Arc<AsyncTransactionRegistry>, ledger: Arc<AsyncPartyLedger>) -> Self {
        Self {
            registry,
            ledger,
            catalog: None,
        }
    }

    /// Tally ratings into a shared catalog
    pub fn with_catalog(mut self, catalog: Arc<Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Process a single command (thread-safe)
    ///
    /// # Errors
    ///
    /// Same as the single-threaded engine: the error of the addressed
    /// operation, `TransactionNotFound`, or `DuplicateTransaction`. Nothing is
    /// committed or settled on error.
    pub fn process_command(&self, command: EscrowCommand) -> Result<(), EscrowError> {
        let EscrowCommand {
            tx,
            caller,
            now,
            action,
        } = command;
        let operation = action.name();

        let settlement = match action {
            Action::Create {
                book,
                quantity,
                price,
                duration,
            } => {
                self.registry.insert(TransactionRecord::create(
                    tx,
                    caller.clone(),
                    book,
                    quantity,
                    price,
                    duration,
                    now,
                ))?;
                Settlement::None
            }
            action => self.registry.update(tx, operation, |record| {
                apply_action(record, &caller, now, action)
            })?,
        };

        debug!(tx, caller = %caller, operation, "applied command");
        let mut sink: &AsyncPartyLedger = &self.ledger;
        settlement.settle(&mut sink, self.catalog.as_deref());
        Ok(())
    }

    /// Sorted copy of every record and party balance
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            transactions: self.registry.get_all(),
            parties: self.ledger.get_all(),
        }
    }
}
