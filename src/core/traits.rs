//! Core traits and settlement types
//!
//! Record operations hand funds back to the host as payouts. The replay engines
//! settle those against a party ledger through [`LedgerSink`], which both the
//! single-threaded and the concurrent ledgers implement. Ratings go to the
//! book catalog when the engine has one.

use crate::core::catalog::Catalog;
use crate::core::transaction::Release;
use crate::types::{Amount, BookId, BookReview, PartyId, Payout};
use tracing::debug;

/// Host-side receiver of funds and reviews leaving the core
pub trait LedgerSink {
    /// Record funds a party moved into escrow
    fn record_deposit(&mut self, party: &PartyId, amount: Amount);

    /// Record funds paid out of escrow
    fn record_payout(&mut self, payout: Payout);

    /// Deliver a review to the customer it was issued to
    fn record_review(&mut self, review: BookReview);
}

/// Funds and artifacts produced by one successful operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// Nothing crosses the escrow boundary
    None,

    /// A party moved funds into escrow
    Deposit { party: PartyId, amount: Amount },

    /// Escrow was drained to one party
    Payout(Payout),

    /// Escrow was released to the store with a review for the customer
    Release(Release),

    /// The customer rated the purchased book
    Rating { book: BookId, rating: u8 },
}

impl Settlement {
    /// Apply this settlement to a ledger and, for ratings, to a catalog
    ///
    /// A rating for a book the catalog does not list is dropped; the record
    /// keeps it either way.
    pub fn settle<L: LedgerSink + ?Sized>(self, ledger: &mut L, catalog: Option<&Catalog>) {
        match self {
            Settlement::None => {}
            Settlement::Deposit { party, amount } => ledger.record_deposit(&party, amount),
            Settlement::Payout(payout) => ledger.record_payout(payout),
            Settlement::Release(release) => {
                ledger.record_payout(release.payout);
                ledger.record_review(release.review);
            }
            Settlement::Rating { book, rating } => {
                let Some(catalog) = catalog else {
                    return;
                };
                if let Err(e) = catalog.record_rating(&book, rating) {
                    debug!(book = %book, error = %e, "rating not tallied");
                }
            }
        }
    }
}

impl From<Option<Payout>> for Settlement {
    fn from(payout: Option<Payout>) -> Self {
        payout.map_or(Settlement::None, Settlement::Payout)
    }
}
