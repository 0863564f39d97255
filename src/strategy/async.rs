//! Asynchronous batch processing strategy
//!
//! This module provides a multi-threaded implementation of the
//! ProcessingStrategy trait. It reads commands in batches and processes each
//! batch with transaction-based partitioning.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (record partitioning + tokio tasks)
//!     └── AsyncEscrowEngine (thread-safe processing)
//!         ├── AsyncTransactionRegistry (records)
//!         └── AsyncPartyLedger (party totals)
//! ```
//!
//! # Ordering
//!
//! Batches are processed one after another, so a record whose commands span
//! several batches still sees them in input order. Within a batch, each
//! record's commands run sequentially on their own task.

use crate::core::r#async::{
    AsyncEscrowEngine, AsyncPartyLedger, AsyncTransactionRegistry, BatchProcessor,
};
use crate::core::LedgerSnapshot;
use crate::io::async_reader::AsyncReader;
use crate::strategy::ProcessingStrategy;
use crate::types::EscrowError;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Configuration for batch processing
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of commands per batch
    pub batch_size: usize,
    /// Number of runtime worker threads processing partitions
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig, replacing zero values with the defaults
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid max_concurrent_batches, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Replay the input on a dedicated multi-threaded tokio runtime
    ///
    /// Rejected commands are logged with their error; malformed rows are
    /// logged by the reader. Both count as rejected in the summary.
    fn process(&self, input_path: &Path) -> Result<LedgerSnapshot, EscrowError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| EscrowError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(async {
            let engine = Arc::new(AsyncEscrowEngine::new(
                Arc::new(AsyncTransactionRegistry::new()),
                Arc::new(AsyncPartyLedger::new()),
            ));
            let processor = BatchProcessor::new(Arc::clone(&engine));

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => EscrowError::FileNotFound {
                        path: input_path.display().to_string(),
                    },
                    _ => EscrowError::from(e),
                })?;
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut applied = 0usize;
            let mut rejected = 0usize;
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                for outcome in processor.process_batch(batch).await {
                    match outcome.result {
                        Ok(()) => applied += 1,
                        Err(e) => {
                            rejected += 1;
                            warn!(
                                tx = outcome.command.tx,
                                operation = outcome.command.action.name(),
                                error = %e,
                                "command rejected"
                            );
                        }
                    }
                }
            }

            let rejected = rejected + reader.skipped();
            info!(applied, rejected, "async replay finished");
            Ok(engine.snapshot())
        })
    }
}
