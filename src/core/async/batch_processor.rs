//! Batch processing with record-based partitioning for async command processing
//!
//! This module provides the `BatchProcessor` struct, which manages concurrent
//! batch processing with transaction-based partitioning. Commands addressed to
//! different records run in parallel; commands addressed to the same record
//! keep their input order.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     └── Arc<AsyncEscrowEngine>  (shared command processor)
//! ```
//!
//! # Determinism
//!
//! A record's fate depends only on the commands addressed to it, and the party
//! ledger only accumulates sums. Processing partitions in any interleaving
//! therefore yields the same final snapshot as a sequential replay.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::error;

use super::AsyncEscrowEngine;
use crate::types::{EscrowCommand, EscrowError, TransactionId};

/// Result of processing a single command
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The command that was processed
    pub command: EscrowCommand,

    /// The result of processing (success or error)
    pub result: Result<(), EscrowError>,
}

/// Batch processor with transaction-based partitioning
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    /// Shared command processor
    engine: Arc<AsyncEscrowEngine>,
}

impl BatchProcessor {
    /// Create a new BatchProcessor over a shared engine
    pub fn new(engine: Arc<AsyncEscrowEngine>) -> Self {
        Self { engine }
    }

    /// Partition a batch of commands by transaction ID
    ///
    /// # Guarantees
    ///
    /// - Each command appears in exactly one partition
    /// - Commands for each record keep their input order
    /// - A partition only contains commands for a single record
    pub fn partition_by_transaction(
        &self,
        batch: Vec<EscrowCommand>,
    ) -> HashMap<TransactionId, Vec<EscrowCommand>> {
        let mut partitions: HashMap<TransactionId, Vec<EscrowCommand>> = HashMap::new();

        for command in batch {
            partitions.entry(command.tx).or_default().push(command);
        }

        partitions
    }

    /// Process all commands for a single record sequentially
    ///
    /// Every command is attempted; errors are captured in the results and do
    /// not stop the partition.
    pub async fn process_transaction_commands(
        &self,
        commands: Vec<EscrowCommand>,
    ) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(commands.len());

        for command in commands {
            let result = self.engine.process_command(command.clone());
            results.push(ProcessingResult { command, result });
        }

        results
    }

    /// Process a batch of commands with transaction-based partitioning
    ///
    /// Spawns one tokio task per record partition and waits for all of them.
    /// Results are grouped by partition, not in input order.
    pub async fn process_batch(&self, batch: Vec<EscrowCommand>) -> Vec<ProcessingResult> {
        let partitions = self.partition_by_transaction(batch);

        let mut tasks = Vec::with_capacity(partitions.len());
        for (_tx, commands) in partitions {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.process_transaction_commands(commands).await
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(partition_results) => results.extend(partition_results),
                Err(e) => error!(error = %e, "partition task failed"),
            }
        }

        results
    }
}
