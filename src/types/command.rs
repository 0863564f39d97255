//! Command types replayed against the escrow ledger
//!
//! A command is one host call: who called, at what time, which record, and the
//! operation with its typed arguments.

use super::party::{Amount, BookId, PartyId, Timestamp, TransactionId};
use super::transaction::Resolution;

/// Operation requested by a caller, with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open a new record owned by the caller
    Create {
        book: BookId,
        quantity: u32,
        price: Amount,
        duration: u64,
    },

    /// Move funds from the customer into escrow
    AddFunds { amount: Amount },

    /// Claim an open record as its store
    Accept,

    /// Mark the order delivered (store only, before the deadline)
    Fulfill,

    /// Raise a dispute (customer only)
    Dispute,

    /// Settle a dispute in favor of one party
    ResolveDispute { resolution: Resolution },

    /// Pay the store after the deadline and issue a review
    ReleasePayment { review: String },

    /// Abandon the current acceptance cycle
    Cancel,

    /// Return escrowed funds to the customer before delivery
    RequestRefund,

    /// Rate the purchase (1..=5)
    Rate { rating: u8 },

    UpdateBook { book: BookId },
    UpdatePrice { price: Amount },
    UpdateQuantity { quantity: u32 },
    UpdateDeadline { deadline: Timestamp },
    UpdateStatus { status: String },
}

impl Action {
    /// Operation name as written in command logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::Create { .. } => "create",
            Action::AddFunds { .. } => "add_funds",
            Action::Accept => "accept",
            Action::Fulfill => "fulfill",
            Action::Dispute => "dispute",
            Action::ResolveDispute { .. } => "resolve_dispute",
            Action::ReleasePayment { .. } => "release_payment",
            Action::Cancel => "cancel",
            Action::RequestRefund => "request_refund",
            Action::Rate { .. } => "rate",
            Action::UpdateBook { .. } => "update_book",
            Action::UpdatePrice { .. } => "update_price",
            Action::UpdateQuantity { .. } => "update_quantity",
            Action::UpdateDeadline { .. } => "update_deadline",
            Action::UpdateStatus { .. } => "update_status",
        }
    }
}

/// A single host call addressed to one transaction record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscrowCommand {
    /// Record the call is addressed to
    pub tx: TransactionId,

    /// Identity authenticated by the host
    pub caller: PartyId,

    /// Host clock reading at the time of the call
    pub now: Timestamp,

    pub action: Action,
}
