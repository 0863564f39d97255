//! Party balance types for the escrow ledger
//!
//! The host ledger is outside the core; this is the view of it the replay
//! engine keeps: how much each party moved into escrow, how much it received
//! back, and the reviews it was issued.

use super::party::{Amount, PartyId};
use super::transaction::BookReview;

/// Per-party totals on the host side of the escrow boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyBalance {
    pub party: PartyId,

    /// Sum of all funds this party placed into escrow
    pub escrowed: Amount,

    /// Sum of all payouts and refunds this party received
    pub received: Amount,

    /// Reviews issued to this party by `release_payment`
    pub reviews: Vec<BookReview>,
}

impl PartyBalance {
    /// Create an empty balance for `party`
    pub fn new(party: PartyId) -> Self {
        PartyBalance {
            party,
            escrowed: 0,
            received: 0,
            reviews: Vec::new(),
        }
    }
}
