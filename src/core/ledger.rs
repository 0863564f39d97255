//! Party ledger
//!
//! This module provides the `PartyLedger` struct which keeps the host-side
//! totals for every party that touched an escrow.
//!
//! The PartyLedger is responsible for:
//! - Creating a balance on a party's first deposit or payout
//! - Accumulating escrowed and received totals
//! - Collecting reviews issued to customers
//! - Providing sorted balance listings for output

use crate::core::traits::LedgerSink;
use crate::types::{Amount, BookReview, PartyBalance, PartyId, Payout};
use std::collections::HashMap;

/// Single-threaded party ledger
#[derive(Debug, Default)]
pub struct PartyLedger {
    /// Map of party IDs to balances
    balances: HashMap<PartyId, PartyBalance>,
}

impl PartyLedger {
    /// Create a new PartyLedger with no balances
    pub fn new() -> Self {
        PartyLedger {
            balances: HashMap::new(),
        }
    }

    /// Get or create the balance for a party
    pub fn get_or_create(&mut self, party: &PartyId) -> &mut PartyBalance {
        self.balances
            .entry(party.clone())
            .or_insert_with(|| PartyBalance::new(party.clone()))
    }

    pub fn get(&self, party: &PartyId) -> Option<&PartyBalance> {
        self.balances.get(party)
    }

    /// Get all balances sorted by party ID
    pub fn get_all(&self) -> Vec<&PartyBalance> {
        let mut balances: Vec<&PartyBalance> = self.balances.values().collect();
        balances.sort_by(|a, b| a.party.cmp(&b.party));
        balances
    }
}

/// Totals saturate at `u64::MAX`; past that cap, escrowed = received + held
/// no longer holds for the capped party.
impl LedgerSink for PartyLedger {
    fn record_deposit(&mut self, party: &PartyId, amount: Amount) {
        let balance = self.get_or_create(party);
        balance.escrowed = balance.escrowed.saturating_add(amount);
    }

    fn record_payout(&mut self, payout: Payout) {
        let amount = payout.amount();
        let balance = self.get_or_create(&payout.recipient);
        balance.received = balance.received.saturating_add(amount);
    }

    fn record_review(&mut self, review: BookReview) {
        let customer = review.customer.clone();
        insert_review(&mut self.get_or_create(&customer).reviews, review);
    }
}

/// Keep reviews ordered by transaction, then by issue order within one record
pub(crate) fn insert_review(reviews: &mut Vec<BookReview>, review: BookReview) {
    let index = reviews.partition_point(|r| r.transaction <= review.transaction);
    reviews.insert(index, review);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::Settlement;
    use crate::core::transaction::Release;
    use crate::types::{BookId, Funds};

    fn payout(recipient: &str, amount: Amount) -> Payout {
        Payout {
            recipient: PartyId::from(recipient),
            funds: Funds::new(amount),
        }
    }

    #[test]
    fn test_deposit_creates_balance() {
        let mut ledger = PartyLedger::new();
        ledger.record_deposit(&PartyId::from("alice"), 100);
        ledger.record_deposit(&PartyId::from("alice"), 50);

        let balance = ledger.get(&PartyId::from("alice")).unwrap();
        assert_eq!(balance.escrowed, 150);
        assert_eq!(balance.received, 0);
    }

    #[test]
    fn test_payout_credits_recipient() {
        let mut ledger = PartyLedger::new();
        ledger.record_payout(payout("shop", 80));

        let balance = ledger.get(&PartyId::from("shop")).unwrap();
        assert_eq!(balance.received, 80);
        assert_eq!(balance.escrowed, 0);
    }

    #[test]
    fn test_release_settlement_delivers_review_to_customer() {
        let mut ledger = PartyLedger::new();
        let review = BookReview {
            transaction: 1,
            customer: PartyId::from("alice"),
            book: BookId::from("B1"),
            text: "loved it".to_string(),
        };

        Settlement::Release(Release {
            payout: payout("shop", 100),
            review: review.clone(),
        })
        .settle(&mut ledger, None);

        assert_eq!(ledger.get(&PartyId::from("shop")).unwrap().received, 100);
        assert_eq!(ledger.get(&PartyId::from("alice")).unwrap().reviews, vec![review]);
    }

    #[test]
    fn test_reviews_ordered_by_transaction() {
        let mut ledger = PartyLedger::new();
        for (tx, text) in [(2, "second"), (1, "first"), (2, "third")] {
            ledger.record_review(BookReview {
                transaction: tx,
                customer: PartyId::from("alice"),
                book: BookId::from("B1"),
                text: text.to_string(),
            });
        }

        let texts: Vec<&str> = ledger
            .get(&PartyId::from("alice"))
            .unwrap()
            .reviews
            .iter()
            .map(|r| r.text.as_str())
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_settlement_creates_nothing() {
        let mut ledger = PartyLedger::new();
        Settlement::from(None).settle(&mut ledger, None);
        assert!(ledger.get_all().is_empty());
    }

    #[test]
    fn test_get_all_sorted_by_party() {
        let mut ledger = PartyLedger::new();
        ledger.record_deposit(&PartyId::from("carol"), 1);
        ledger.record_deposit(&PartyId::from("alice"), 1);
        ledger.record_payout(payout("bob", 1));

        let parties: Vec<&str> = ledger.get_all().iter().map(|b| b.party.as_str()).collect();
        assert_eq!(parties, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_totals_saturate_at_max() {
        let mut ledger = PartyLedger::new();
        let alice = PartyId::from("alice");
        ledger.record_deposit(&alice, u64::MAX - 1);
        ledger.record_deposit(&alice, 10);
        ledger.record_payout(payout("alice", u64::MAX));
        ledger.record_payout(payout("alice", 1));

        let balance = ledger.get(&alice).unwrap();
        assert_eq!(balance.escrowed, u64::MAX);
        assert_eq!(balance.received, u64::MAX);
    }
}
