//! Transaction record types for the escrow ledger
//!
//! This module defines the per-purchase record, its explicit lifecycle state,
//! dispute outcomes and the review issued on payout. The operations that move a
//! record between states live in [`crate::core`].

use super::escrow::EscrowAccount;
use super::party::{Amount, BookId, PartyId, Timestamp, TransactionId};
use std::fmt;

/// Status label given to every freshly created record
pub const INITIAL_STATUS: &str = "open";

/// Lifecycle state of a transaction record
///
/// The assigned store travels with the state, so a record can never carry a
/// store while `Open` or lose it while `Accepted`, `Fulfilled` or `Disputed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionState {
    /// No store assigned; waiting for acceptance
    Open,

    /// A store accepted the order and has not delivered yet
    Accepted { store: PartyId },

    /// The store delivered; payment can be released after the deadline
    Fulfilled { store: PartyId },

    /// The customer raised a dispute; only dispute resolution can settle it
    Disputed { store: PartyId, fulfilled: bool },
}

impl TransactionState {
    /// The store assigned in the current cycle, if any
    pub fn store(&self) -> Option<&PartyId> {
        match self {
            TransactionState::Open => None,
            TransactionState::Accepted { store }
            | TransactionState::Fulfilled { store }
            | TransactionState::Disputed { store, .. } => Some(store),
        }
    }

    pub fn is_fulfilled(&self) -> bool {
        matches!(
            self,
            TransactionState::Fulfilled { .. }
                | TransactionState::Disputed {
                    fulfilled: true,
                    ..
                }
        )
    }

    pub fn is_disputed(&self) -> bool {
        matches!(self, TransactionState::Disputed { .. })
    }

    /// Short lowercase label used in reports and error messages
    pub fn label(&self) -> &'static str {
        match self {
            TransactionState::Open => "open",
            TransactionState::Accepted { .. } => "accepted",
            TransactionState::Fulfilled { .. } => "fulfilled",
            TransactionState::Disputed { .. } => "disputed",
        }
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which party a dispute is settled in favor of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Escrow is refunded to the customer
    InFavorOfCustomer,

    /// Escrow is paid out to the store
    InFavorOfStore,
}

/// Review issued to the customer when payment is released
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookReview {
    pub transaction: TransactionId,
    pub customer: PartyId,
    pub book: BookId,
    pub text: String,
}

/// Per-purchase escrow record
///
/// Fields are only mutated through the operations in [`crate::core`], which
/// validate the caller and the current state on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub(crate) id: TransactionId,
    pub(crate) customer: PartyId,
    pub(crate) book: BookId,
    pub(crate) quantity: u32,
    pub(crate) price: Amount,
    pub(crate) escrow: EscrowAccount,
    pub(crate) state: TransactionState,
    pub(crate) rating: Option<u8>,
    pub(crate) status: String,
    pub(crate) created_at: Timestamp,
    pub(crate) deadline: Timestamp,
}

impl TransactionRecord {
    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn customer(&self) -> &PartyId {
        &self.customer
    }

    pub fn store(&self) -> Option<&PartyId> {
        self.state.store()
    }

    pub fn book(&self) -> &BookId {
        &self.book
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit amount the customer is expected to place in escrow
    pub fn price(&self) -> Amount {
        self.price
    }

    pub fn escrow_balance(&self) -> Amount {
        self.escrow.balance()
    }

    pub fn state(&self) -> &TransactionState {
        &self.state
    }

    pub fn is_fulfilled(&self) -> bool {
        self.state.is_fulfilled()
    }

    pub fn is_disputed(&self) -> bool {
        self.state.is_disputed()
    }

    pub fn rating(&self) -> Option<u8> {
        self.rating
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn deadline(&self) -> Timestamp {
        self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn store() -> PartyId {
        PartyId::from("store")
    }

    #[rstest]
    #[case::open(TransactionState::Open, None, false, false, "open")]
    #[case::accepted(
        TransactionState::Accepted { store: store() },
        Some(store()),
        false,
        false,
        "accepted"
    )]
    #[case::fulfilled(
        TransactionState::Fulfilled { store: store() },
        Some(store()),
        true,
        false,
        "fulfilled"
    )]
    #[case::disputed_before_delivery(
        TransactionState::Disputed { store: store(), fulfilled: false },
        Some(store()),
        false,
        true,
        "disputed"
    )]
    #[case::disputed_after_delivery(
        TransactionState::Disputed { store: store(), fulfilled: true },
        Some(store()),
        true,
        true,
        "disputed"
    )]
    fn test_state_derived_fields(
        #[case] state: TransactionState,
        #[case] expected_store: Option<PartyId>,
        #[case] fulfilled: bool,
        #[case] disputed: bool,
        #[case] label: &str,
    ) {
        assert_eq!(state.store(), expected_store.as_ref());
        assert_eq!(state.is_fulfilled(), fulfilled);
        assert_eq!(state.is_disputed(), disputed);
        assert_eq!(state.to_string(), label);
    }
}
