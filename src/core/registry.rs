//! Transaction registry
//!
//! This module provides the TransactionRegistry component that makes every
//! transaction record addressable by its `TransactionId` and mutable only
//! through atomic updates.
//!
//! # Atomic Commits
//!
//! `update` runs an operation against a working copy of the record and writes
//! the copy back only if the operation succeeds. A failed call therefore never
//! leaves a partially mutated record behind.
//!
//! # Duplicate Handling
//!
//! Creating a record under an ID that is already taken is rejected; the
//! existing record is left untouched.

use crate::types::{EscrowError, TransactionId, TransactionRecord};
use std::collections::HashMap;

/// Single-threaded record store
#[derive(Debug, Default)]
pub struct TransactionRegistry {
    /// Map of transaction ID to record
    records: HashMap<TransactionId, TransactionRecord>,
}

impl TransactionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        TransactionRegistry {
            records: HashMap::new(),
        }
    }

    /// Register a freshly created record under its own ID
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTransaction` if the ID is already registered.
    pub fn insert(&mut self, record: TransactionRecord) -> Result<(), EscrowError> {
        let tx = record.id();
        if self.records.contains_key(&tx) {
            return Err(EscrowError::duplicate_transaction(tx));
        }
        self.records.insert(tx, record);
        Ok(())
    }

    /// Get an immutable reference to a record
    pub fn get(&self, tx: TransactionId) -> Option<&TransactionRecord> {
        self.records.get(&tx)
    }

    /// Apply an operation to one record as a single atomic commit
    ///
    /// # Arguments
    ///
    /// * `tx` - The record to address
    /// * `operation` - Operation name used in the not-found error
    /// * `f` - The operation; its error discards every change it made
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if no record has this ID, or whatever
    /// error `f` returns.
    pub fn update<T, F>(
        &mut self,
        tx: TransactionId,
        operation: &str,
        f: F,
    ) -> Result<T, EscrowError>
    where
        F: FnOnce(&mut TransactionRecord) -> Result<T, EscrowError>,
    {
        let record = self
            .records
            .get_mut(&tx)
            .ok_or_else(|| EscrowError::transaction_not_found(tx, operation))?;

        let mut working = record.clone();
        let value = f(&mut working)?;
        *record = working;
        Ok(value)
    }

    /// Get all records sorted by ID
    pub fn get_all(&self) -> Vec<&TransactionRecord> {
        let mut records: Vec<&TransactionRecord> = self.records.values().collect();
        records.sort_by_key(|record| record.id());
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
