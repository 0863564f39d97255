//! Thread-safe party ledger for async batch processing
//!
//! This module provides the `AsyncPartyLedger` struct, which accumulates party
//! totals from many tasks at once.
//!
//! # Design
//!
//! Balances live in a `DashMap` keyed by party. Every ledger change is an
//! addition (or an ordered review insert), so the final totals do not depend
//! on the order in which concurrent partitions settle.

use crate::core::ledger::insert_review;
use crate::core::traits::LedgerSink;
use crate::types::{Amount, BookReview, PartyBalance, PartyId, Payout};
use dashmap::DashMap;

/// Thread-safe party ledger
#[derive(Debug)]
pub struct AsyncPartyLedger {
    /// Concurrent map of party ID to balance
    balances: DashMap<PartyId, PartyBalance>,
}

impl AsyncPartyLedger {
    /// Create a new AsyncPartyLedger with no balances
    pub fn new() -> Self {
        Self {
            balances: DashMap::new(),
        }
    }

    /// Update a party's balance using a closure
    ///
    /// The balance is created if missing and locked for the duration of the
    /// closure.
    pub fn update<F>(&self, party: &PartyId, f: F)
    where
        F: FnOnce(&mut PartyBalance),
    {
        let mut entry = self
            .balances
            .entry(party.clone())
            .or_insert_with(|| PartyBalance::new(party.clone()));
        f(entry.value_mut())
    }

    /// Get a clone of one party's balance
    pub fn get(&self, party: &PartyId) -> Option<PartyBalance> {
        self.balances.get(party).map(|entry| entry.value().clone())
    }

    /// Get all balances sorted by party ID
    ///
    /// Returns a snapshot; balances may change after this method returns.
    pub fn get_all(&self) -> Vec<PartyBalance> {
        let mut balances: Vec<PartyBalance> = self
            .balances
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        balances.sort_by(|a, b| a.party.cmp(&b.party));
        balances
    }
}

impl Default for AsyncPartyLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Totals saturate at `u64::MAX`, as in the single-threaded ledger
impl LedgerSink for &AsyncPartyLedger {
    fn record_deposit(&mut self, party: &PartyId, amount: Amount) {
        self.update(party, |balance| {
            balance.escrowed = balance.escrowed.saturating_add(amount);
        });
    }

    fn record_payout(&mut self, payout: Payout) {
        let amount = payout.amount();
        self.update(&payout.recipient, |balance| {
            balance.received = balance.received.saturating_add(amount);
        });
    }

    fn record_review(&mut self, review: BookReview) {
        let customer = review.customer.clone();
        self.update(&customer, |balance| insert_review(&mut balance.reviews, review));
    }
}
