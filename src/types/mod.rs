//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `party`: Identifiers, amounts and timestamps
//! - `balance`: Per-party totals kept by the replay engine
//! - `escrow`: Escrow custody, funds and payouts
//! - `transaction`: Transaction records, lifecycle state and reviews
//! - `command`: Host calls replayed against the ledger
//! - `error`: Error types for the escrow ledger

pub mod balance;
pub mod command;
pub mod error;
pub mod escrow;
pub mod party;
pub mod transaction;

pub use balance::PartyBalance;
pub use command::{Action, EscrowCommand};
pub use error::{ErrorKind, EscrowError, Role};
pub use escrow::{EscrowAccount, Funds, Payout};
pub use party::{Amount, BookId, PartyId, Timestamp, TransactionId};
pub use transaction::{BookReview, Resolution, TransactionRecord, TransactionState};
