//! Processing strategy module for command replay
//!
//! This module defines the Strategy pattern for complete replay pipelines,
//! covering both CSV parsing and engine processing. This allows the
//! sequential and the batched parallel implementation to be selected at
//! runtime. Both produce the same `LedgerSnapshot` for the same input.

use crate::cli::StrategyType;
use crate::core::LedgerSnapshot;
use crate::types::EscrowError;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete replay pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Replay every command in the input file and return the final ledger
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal conditions: the input file cannot be
    /// opened or the runtime cannot start. Malformed rows and rejected
    /// commands are logged and skipped.
    fn process(&self, input_path: &Path) -> Result<LedgerSnapshot, EscrowError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` is only used by the async strategy; `None` selects the defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}
