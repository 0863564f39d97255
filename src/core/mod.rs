//! Core business logic module
//!
//! This module contains the escrow components:
//! - `state` - Lifecycle states and the central transition function
//! - `guards` - Caller and deadline checks shared by every operation
//! - `transaction` - Per-record operations
//! - `dispute` - Dispute resolution
//! - `registry` - Record storage with atomic per-record updates
//! - `ledger` - Host-side party totals
//! - `traits` - Settlement of payouts into a ledger
//! - `engine` - Command replay orchestration
//! - `catalog` - Book listings and ratings
//! - `async` - Concurrent implementations

pub mod r#async;
pub mod catalog;
pub mod dispute;
pub mod engine;
pub mod guards;
pub mod ledger;
pub mod registry;
pub mod state;
pub mod traits;
pub mod transaction;

pub use catalog::{AdminCap, BookListing, Catalog};
pub use engine::{EscrowEngine, LedgerSnapshot};
pub use ledger::PartyLedger;
pub use r#async::{AsyncEscrowEngine, AsyncPartyLedger, AsyncTransactionRegistry};
pub use registry::TransactionRegistry;
pub use state::Event;
pub use traits::{LedgerSink, Settlement};
pub use transaction::Release;
