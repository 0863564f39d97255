//! Escrow Ledger Library
//! # Overview
//!
//! Escrow for a peer-to-peer book marketplace. A customer opens a purchase
//! record and funds its escrow, a store claims the order, delivers, and is
//! paid once the deadline has passed; customers can refund, cancel, or open a
//! dispute that they settle in favor of either party. The crate replays a log
//! of these calls sequentially or in parallel batches and reports the final
//! ledger.
//!
//! # Architecture
//!
//! - [`types`] - Identifiers, funds, records, commands and errors
//! - [`cli`] - CLI argument parsing
//! - [`core`] - Business logic:
//!   - [`core::state`] - Lifecycle states and transitions
//!   - [`core::transaction`] / [`core::dispute`] - Record operations
//!   - [`core::registry`] - Record storage with atomic updates
//!   - [`core::ledger`] - Party totals
//!   - [`core::engine`] - Command replay
//!   - [`core::catalog`] - Book listings behind an admin capability
//! - [`io`] - CSV command reading and report writing
//! - [`strategy`] - Sequential and batched replay pipelines
//!
//! # Lifecycle
//!
//! A record is `open`, `accepted`, `fulfilled` or `disputed`. Every path back
//! to `open` (release, refund, cancel of an accepted order, dispute
//! resolution) empties the escrow and clears the store, so the same record
//! can be accepted again for a new cycle.

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{
    AdminCap, BookListing, Catalog, EscrowEngine, LedgerSnapshot, PartyLedger, TransactionRegistry,
};
pub use io::write_report;
pub use types::{
    Action, BookId, EscrowCommand, EscrowError, PartyBalance, PartyId, Resolution, TransactionId,
    TransactionRecord, TransactionState,
};
