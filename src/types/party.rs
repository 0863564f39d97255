//! Identifier and scalar types shared across the escrow ledger
//!
//! Identities are opaque to the core: the host authenticates callers and the
//! ledger only ever compares identities for equality.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Record identifier
///
/// Supports transaction IDs from 0 to 4,294,967,295
pub type TransactionId = u32;

/// Non-negative amount of the single escrow currency
pub type Amount = u64;

/// Milliseconds on the host's monotonic clock
pub type Timestamp = u64;

/// Opaque identity of a customer, store or catalog owner
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyId(String);

impl PartyId {
    pub fn new(id: impl Into<String>) -> Self {
        PartyId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartyId {
    fn from(id: &str) -> Self {
        PartyId::new(id)
    }
}

/// Opaque reference to a catalog item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn new(id: impl Into<String>) -> Self {
        BookId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookId {
    fn from(id: &str) -> Self {
        BookId::new(id)
    }
}
