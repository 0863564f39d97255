//! Synchronous processing strategy
//!
//! This module provides a sequential, single-threaded implementation of the
//! ProcessingStrategy trait. It streams commands from the `SyncReader` into
//! an `EscrowEngine` one at a time, so memory use grows with the number of
//! records and parties rather than with the length of the log.

use crate::core::{EscrowEngine, LedgerSnapshot};
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;
use crate::types::EscrowError;
use std::path::Path;
use tracing::{info, warn};

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use escrow_ledger::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
///
/// let snapshot = SyncProcessingStrategy
///     .process(Path::new("commands.csv"))
///     .expect("Processing failed");
/// println!("{} records", snapshot.transactions.len());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path) -> Result<LedgerSnapshot, EscrowError> {
        let mut engine = EscrowEngine::new();
        let reader = SyncReader::new(input_path)?;

        let mut applied = 0usize;
        let mut rejected = 0usize;
        for result in reader {
            match result {
                Ok(command) => {
                    let (tx, operation) = (command.tx, command.action.name());
                    match engine.process(command) {
                        Ok(()) => applied += 1,
                        Err(e) => {
                            rejected += 1;
                            warn!(tx, operation, error = %e, "command rejected");
                        }
                    }
                }
                Err(e) => {
                    rejected += 1;
                    warn!(error = %e, "skipping command row");
                }
            }
        }

        info!(applied, rejected, "sync replay finished");
        Ok(engine.snapshot())
    }
}
