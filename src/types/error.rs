//! Error types for the escrow ledger
//!
//! This module defines all error types that can occur while replaying host calls
//! against transaction records. Every error is a synchronous precondition
//! failure: the operation that raised it made no change to any record.
//!
//! # Error Categories
//!
//! - **Authorization**: caller is not the customer/store/catalog owner
//! - **Invalid state**: the record's lifecycle state forbids the operation
//! - **Deadline**: the operation ran on the wrong side of the deadline
//! - **Insufficient funds**: escrow cannot cover the withdrawal
//! - **Input**: file, I/O and command log parsing failures

use super::party::{Amount, BookId, PartyId, Timestamp, TransactionId};
use std::fmt;
use thiserror::Error;

/// The party an operation expects as caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Store,
    /// Either the customer or the assigned store
    Party,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Customer => f.write_str("customer"),
            Role::Store => f.write_str("store"),
            Role::Party => f.write_str("customer or store"),
        }
    }
}

/// Coarse classification of [`EscrowError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authorization,
    InvalidState,
    Deadline,
    InsufficientFunds,
    Input,
}

/// Main error type for the escrow ledger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscrowError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError { message: String },

    /// CSV parsing error occurred
    ///
    /// The malformed row is skipped and processing continues.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError { line: Option<u64>, message: String },

    /// Unknown operation name in the command log
    #[error("Invalid command type '{op}'{}", tx.map(|t| format!(" for transaction {}", t)).unwrap_or_default())]
    InvalidCommandType { op: String, tx: Option<TransactionId> },

    /// A column required by the operation is empty
    #[error("{op} command for transaction {tx} requires {field}")]
    MissingField {
        op: String,
        field: String,
        tx: TransactionId,
    },

    /// A column holds a value the operation cannot use
    #[error("Invalid {field} '{value}' for transaction {tx}")]
    InvalidField {
        field: String,
        value: String,
        tx: TransactionId,
    },

    /// Caller identity does not match the role the operation requires
    #[error("{caller} is not the {role} of transaction {tx} ({operation})")]
    Unauthorized {
        tx: TransactionId,
        caller: PartyId,
        role: Role,
        operation: String,
    },

    /// Capability presented to a catalog belongs to another owner
    #[error("Capability held by {holder} does not administer this catalog")]
    NotAdmin { holder: PartyId },

    /// `accept` on a record that already has a store
    #[error("Transaction {tx} was already accepted by {store}")]
    StoreAlreadyAssigned { tx: TransactionId, store: PartyId },

    #[error("Transaction {tx} has no store assigned ({operation})")]
    NoStoreAssigned { tx: TransactionId, operation: String },

    #[error("Transaction {tx} is not under dispute ({operation})")]
    NotDisputed { tx: TransactionId, operation: String },

    #[error("Transaction {tx} is under dispute ({operation})")]
    AlreadyDisputed { tx: TransactionId, operation: String },

    #[error("Transaction {tx} has not been fulfilled ({operation})")]
    NotFulfilled { tx: TransactionId, operation: String },

    #[error("Transaction {tx} has already been fulfilled ({operation})")]
    AlreadyFulfilled { tx: TransactionId, operation: String },

    /// Rating outside 1..=5
    #[error("Rating {rating} is outside 1..=5")]
    InvalidRating { rating: u8 },

    #[error("Transaction {tx} not found for {operation}")]
    TransactionNotFound { tx: TransactionId, operation: String },

    #[error("Duplicate transaction ID {tx}")]
    DuplicateTransaction { tx: TransactionId },

    #[error("Book {book} is already listed")]
    BookAlreadyListed { book: BookId },

    #[error("Book {book} is not listed")]
    BookNotListed { book: BookId },

    /// Fulfillment attempted at or after the deadline
    #[error("Deadline {deadline} for transaction {tx} has passed (now {now})")]
    DeadlinePassed {
        tx: TransactionId,
        now: Timestamp,
        deadline: Timestamp,
    },

    /// Payment release attempted at or before the deadline
    #[error("Deadline {deadline} for transaction {tx} has not been reached (now {now})")]
    DeadlineNotReached {
        tx: TransactionId,
        now: Timestamp,
        deadline: Timestamp,
    },

    /// Withdrawal larger than the escrow balance
    #[error("Insufficient escrow funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Amount, requested: Amount },

    /// Payout requested from an empty escrow
    #[error("Escrow of transaction {tx} is empty")]
    EmptyEscrow { tx: TransactionId },

    #[error("Arithmetic overflow in {operation}")]
    ArithmeticOverflow { operation: String },
}

// Conversion from io::Error to EscrowError
impl From<std::io::Error> for EscrowError {
    fn from(error: std::io::Error) -> Self {
        EscrowError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to EscrowError
impl From<csv::Error> for EscrowError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        EscrowError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl EscrowError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            EscrowError::Unauthorized { .. } | EscrowError::NotAdmin { .. } => {
                ErrorKind::Authorization
            }
            EscrowError::StoreAlreadyAssigned { .. }
            | EscrowError::NoStoreAssigned { .. }
            | EscrowError::NotDisputed { .. }
            | EscrowError::AlreadyDisputed { .. }
            | EscrowError::NotFulfilled { .. }
            | EscrowError::AlreadyFulfilled { .. }
            | EscrowError::InvalidRating { .. }
            | EscrowError::TransactionNotFound { .. }
            | EscrowError::DuplicateTransaction { .. }
            | EscrowError::BookAlreadyListed { .. }
            | EscrowError::BookNotListed { .. } => ErrorKind::InvalidState,
            EscrowError::DeadlinePassed { .. } | EscrowError::DeadlineNotReached { .. } => {
                ErrorKind::Deadline
            }
            EscrowError::InsufficientFunds { .. }
            | EscrowError::EmptyEscrow { .. }
            | EscrowError::ArithmeticOverflow { .. } => ErrorKind::InsufficientFunds,
            EscrowError::FileNotFound { .. }
            | EscrowError::IoError { .. }
            | EscrowError::ParseError { .. }
            | EscrowError::InvalidCommandType { .. }
            | EscrowError::MissingField { .. }
            | EscrowError::InvalidField { .. } => ErrorKind::Input,
        }
    }
}

// Helper functions for creating common errors

impl EscrowError {
    pub fn unauthorized(tx: TransactionId, caller: &PartyId, role: Role, operation: &str) -> Self {
        EscrowError::Unauthorized {
            tx,
            caller: caller.clone(),
            role,
            operation: operation.to_string(),
        }
    }

    pub fn store_already_assigned(tx: TransactionId, store: &PartyId) -> Self {
        EscrowError::StoreAlreadyAssigned {
            tx,
            store: store.clone(),
        }
    }

    pub fn no_store_assigned(tx: TransactionId, operation: &str) -> Self {
        EscrowError::NoStoreAssigned {
            tx,
            operation: operation.to_string(),
        }
    }

    pub fn not_disputed(tx: TransactionId, operation: &str) -> Self {
        EscrowError::NotDisputed {
            tx,
            operation: operation.to_string(),
        }
    }

    pub fn already_disputed(tx: TransactionId, operation: &str) -> Self {
        EscrowError::AlreadyDisputed {
            tx,
            operation: operation.to_string(),
        }
    }

    pub fn not_fulfilled(tx: TransactionId, operation: &str) -> Self {
        EscrowError::NotFulfilled {
            tx,
            operation: operation.to_string(),
        }
    }

    pub fn already_fulfilled(tx: TransactionId, operation: &str) -> Self {
        EscrowError::AlreadyFulfilled {
            tx,
            operation: operation.to_string(),
        }
    }

    pub fn transaction_not_found(tx: TransactionId, operation: &str) -> Self {
        EscrowError::TransactionNotFound {
            tx,
            operation: operation.to_string(),
        }
    }

    pub fn duplicate_transaction(tx: TransactionId) -> Self {
        EscrowError::DuplicateTransaction { tx }
    }

    pub fn insufficient_funds(balance: Amount, requested: Amount) -> Self {
        EscrowError::InsufficientFunds { balance, requested }
    }

    pub fn arithmetic_overflow(operation: &str) -> Self {
        EscrowError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }

    pub fn invalid_command_type(op: &str, tx: Option<TransactionId>) -> Self {
        EscrowError::InvalidCommandType {
            op: op.to_string(),
            tx,
        }
    }

    pub fn missing_field(op: &str, field: &str, tx: TransactionId) -> Self {
        EscrowError::MissingField {
            op: op.to_string(),
            field: field.to_string(),
            tx,
        }
    }

    pub fn invalid_field(field: &str, value: &str, tx: TransactionId) -> Self {
        EscrowError::InvalidField {
            field: field.to_string(),
            value: value.to_string(),
            tx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::file_not_found(
        EscrowError::FileNotFound { path: "calls.csv".to_string() },
        "File not found: calls.csv"
    )]
    #[case::parse_error_with_line(
        EscrowError::ParseError { line: Some(42), message: "Invalid field".to_string() },
        "CSV parse error at line 42: Invalid field"
    )]
    #[case::parse_error_without_line(
        EscrowError::ParseError { line: None, message: "Invalid field".to_string() },
        "CSV parse error: Invalid field"
    )]
    #[case::invalid_command_type(
        EscrowError::invalid_command_type("chargeback", Some(7)),
        "Invalid command type 'chargeback' for transaction 7"
    )]
    #[case::missing_field(
        EscrowError::missing_field("add_funds", "value", 3),
        "add_funds command for transaction 3 requires value"
    )]
    #[case::unauthorized(
        EscrowError::unauthorized(1, &PartyId::from("mallory"), Role::Store, "fulfill"),
        "mallory is not the store of transaction 1 (fulfill)"
    )]
    #[case::unauthorized_party(
        EscrowError::unauthorized(1, &PartyId::from("mallory"), Role::Party, "cancel"),
        "mallory is not the customer or store of transaction 1 (cancel)"
    )]
    #[case::store_already_assigned(
        EscrowError::store_already_assigned(9, &PartyId::from("shop")),
        "Transaction 9 was already accepted by shop"
    )]
    #[case::deadline_passed(
        EscrowError::DeadlinePassed { tx: 2, now: 1500, deadline: 1000 },
        "Deadline 1000 for transaction 2 has passed (now 1500)"
    )]
    #[case::insufficient_funds(
        EscrowError::insufficient_funds(50, 100),
        "Insufficient escrow funds: balance 50, requested 100"
    )]
    fn test_error_display(#[case] error: EscrowError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::unauthorized(
        EscrowError::unauthorized(1, &PartyId::from("x"), Role::Customer, "rate"),
        ErrorKind::Authorization
    )]
    #[case::not_admin(
        EscrowError::NotAdmin { holder: PartyId::from("x") },
        ErrorKind::Authorization
    )]
    #[case::store_assigned(
        EscrowError::store_already_assigned(1, &PartyId::from("s")),
        ErrorKind::InvalidState
    )]
    #[case::not_disputed(EscrowError::not_disputed(1, "resolve_dispute"), ErrorKind::InvalidState)]
    #[case::deadline_not_reached(
        EscrowError::DeadlineNotReached { tx: 1, now: 5, deadline: 10 },
        ErrorKind::Deadline
    )]
    #[case::empty_escrow(EscrowError::EmptyEscrow { tx: 1 }, ErrorKind::InsufficientFunds)]
    #[case::insufficient(EscrowError::insufficient_funds(0, 1), ErrorKind::InsufficientFunds)]
    #[case::parse(EscrowError::ParseError { line: None, message: String::new() }, ErrorKind::Input)]
    fn test_error_kind(#[case] error: EscrowError, #[case] expected: ErrorKind) {
        assert_eq!(error.kind(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: EscrowError = io_error.into();
        assert!(matches!(error, EscrowError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
