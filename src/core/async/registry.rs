//! Thread-safe transaction registry for async batch processing
//!
//! This module provides the `AsyncTransactionRegistry` struct, which stores
//! transaction records in concurrent data structures so that records can be
//! addressed from many tasks at once.
//!
//! # Design
//!
//! The registry uses `DashMap` (a concurrent HashMap) with fine-grained locking.
//! An update holds the lock on the addressed record only, so calls on different
//! records proceed in parallel while calls on the same record are serialized.
//!
//! # Atomic Commits
//!
//! Like the single-threaded registry, `update` runs the operation against a
//! working copy and writes it back only on success. The entry lock is held for
//! the whole operation, so no other task can observe the working copy.

use crate::types::{EscrowError, TransactionId, TransactionRecord};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Thread-safe record store for async batch processing
///
/// # Thread Safety
///
/// All methods take `&self` and are safe to call from multiple threads
/// concurrently. The internal `DashMap` ensures that:
/// - Concurrent access to different records doesn't block
/// - Operations on the same record are serialized
#[derive(Debug)]
pub struct AsyncTransactionRegistry {
    /// Concurrent map of transaction ID to record
    records: DashMap<TransactionId, TransactionRecord>,
}

impl AsyncTransactionRegistry {
    /// Create a new empty AsyncTransactionRegistry
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }
}

impl Default for AsyncTransactionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncTransactionRegistry {
    /// Register a freshly created record (thread-safe)
    ///
    /// If two tasks race to create the same ID, exactly one wins and the other
    /// receives `DuplicateTransaction`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTransaction` if the ID is already registered.
    pub fn insert(&self, record: TransactionRecord) -> Result<(), EscrowError> {
        match self.records.entry(record.id()) {
            Entry::Occupied(entry) => Err(EscrowError::duplicate_transaction(*entry.key())),
            Entry::Vacant(entry) => {
                entry.insert(record);
                Ok(())
            }
        }
    }

    /// Get a record (read-only, thread-safe)
    ///
    /// The record is cloned to avoid holding the lock after the call returns.
    pub fn get(&self, tx: TransactionId) -> Option<TransactionRecord> {
        self.records.get(&tx).map(|entry| entry.value().clone())
    }

    /// Apply an operation to one record as a single atomic commit (thread-safe)
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
    ///
    /// # Thread Safety
    ///
    /// The closure executes while holding the lock on this record. Tasks
    /// addressing the same record wait; tasks on other records proceed.
    pub fn update<T, F>(&self, tx: TransactionId, operation: &str, f: F) -> Result<T, EscrowError>
    where
        F: FnOnce(&mut TransactionRecord) -> Result<T, EscrowError>,
    {
        let mut entry = self
            .records
            .get_mut(&tx)
            .ok_or_else(|| EscrowError::transaction_not_found(tx, operation))?;

        let mut working = entry.value().clone();
        let value = f(&mut working)?;
        *entry.value_mut() = working;
        Ok(value)
    }

    /// Get all records sorted by ID
    ///
    /// Returns a snapshot; records may change after this method returns.
    pub fn get_all(&self) -> Vec<TransactionRecord> {
        let mut records: Vec<TransactionRecord> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BookId, Funds, PartyId};
    use std::sync::Arc;
    use std::thread;

    fn record(tx: TransactionId, customer: &str) -> TransactionRecord {
        TransactionRecord::create(tx, PartyId::from(customer), BookId::from("B1"), 1, 100, 1000, 0)
    }

    #[test]
    fn test_insert_and_retrieve_record() {
        let registry = AsyncTransactionRegistry::new();
        registry.insert(record(123, "alice")).unwrap();

        let retrieved = registry.get(123).unwrap();
        assert_eq!(retrieved.customer(), &PartyId::from("alice"));
        assert!(registry.get(999).is_none());
    }

    #[test]
    fn test_duplicate_insert_keeps_first_record() {
        let registry = AsyncTransactionRegistry::new();
        registry.insert(record(1, "alice")).unwrap();

        let result = registry.insert(record(1, "bob"));
        assert_eq!(result, Err(EscrowError::DuplicateTransaction { tx: 1 }));
        assert_eq!(registry.get(1).unwrap().customer(), &PartyId::from("alice"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_update_discards_partial_changes_on_error() {
        let registry = AsyncTransactionRegistry::new();
        registry.insert(record(1, "alice")).unwrap();

        let result: Result<(), EscrowError> = registry.update(1, "test", |r| {
            r.add_funds(&PartyId::from("alice"), Funds::new(40))?;
            r.accept(&PartyId::from("shop"))?;
            r.accept(&PartyId::from("other"))
        });

        assert!(matches!(result, Err(EscrowError::StoreAlreadyAssigned { .. })));
        let stored = registry.get(1).unwrap();
        assert_eq!(stored.escrow_balance(), 0);
        assert_eq!(stored.store(), None);
    }

    #[test]
    fn test_update_unknown_record() {
        let registry = AsyncTransactionRegistry::new();

        let result = registry.update(999, "fulfill", |r| r.fulfill(&PartyId::from("shop"), 0));
        match result {
            Err(EscrowError::TransactionNotFound { tx, operation }) => {
                assert_eq!(tx, 999);
                assert_eq!(operation, "fulfill");
            }
            _ => panic!("Expected TransactionNotFound error"),
        }
    }

    #[test]
    fn test_concurrent_updates_to_same_record_are_serialized() {
        let registry = Arc::new(AsyncTransactionRegistry::new());
        registry.insert(record(1, "alice")).unwrap();

        let mut handles = vec![];
        for _ in 0..10 {
            let registry = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    registry
                        .update(1, "add_funds", |r| {
                            r.add_funds(&PartyId::from("alice"), Funds::new(1))
                        })
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.get(1).unwrap().escrow_balance(), 1000);
    }

    #[test]
    fn test_concurrent_inserts_only_one_wins() {
        let registry = Arc::new(AsyncTransactionRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.insert(record(7, &format!("party{}", i))).is_ok())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }

    #[test]
    fn test_get_all_sorted_by_id() {
        let registry = AsyncTransactionRegistry::new();
        for tx in [9, 2, 4] {
            registry.insert(record(tx, "alice")).unwrap();
        }

        let ids: Vec<TransactionId> = registry.get_all().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![2, 4, 9]);
    }
}
