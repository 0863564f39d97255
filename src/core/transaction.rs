//! Transaction record operations
//!
//! Implements the per-purchase state machine. Each operation follows the same
//! order: authorize the caller, validate state and deadline, move funds, then
//! commit the new state. An operation that returns an error has not changed the
//! record.
//!
//! # Lifecycle
//!
//! ```text
//! Open --accept--> Accepted --fulfill--> Fulfilled --release_payment--> Open
//!                     |                      |
//!                     +------dispute---------+--> Disputed --resolve_dispute--> Open
//! ```
//!
//! `cancel` and `request_refund` return `Open`/`Accepted` records to `Open`.
//! Every path back to `Open` drains the escrow, so the same record can be
//! accepted again for a new cycle.

use crate::core::guards::{
    ensure_after_deadline, ensure_before_deadline, ensure_customer, ensure_party, ensure_store,
};
use crate::core::state::Event;
use crate::types::transaction::INITIAL_STATUS;
use crate::types::{
    Amount, BookId, BookReview, EscrowAccount, EscrowError, Funds, PartyId, Payout, Timestamp,
    TransactionId, TransactionRecord, TransactionState,
};

/// Outcome of a successful `release_payment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Escrow paid to the store
    pub payout: Payout,

    /// Review delivered to the customer
    pub review: BookReview,
}

impl TransactionRecord {
    /// Open a new record for `customer` with an empty escrow
    ///
    /// The deadline is fixed at `now + duration` (saturating).
    pub fn create(
        id: TransactionId,
        customer: PartyId,
        book: BookId,
        quantity: u32,
        price: Amount,
        duration: u64,
        now: Timestamp,
    ) -> Self {
        TransactionRecord {
            id,
            customer,
            book,
            quantity,
            price,
            escrow: EscrowAccount::new(),
            state: TransactionState::Open,
            rating: None,
            status: INITIAL_STATUS.to_string(),
            created_at: now,
            deadline: now.saturating_add(duration),
        }
    }

    /// Move customer funds into escrow
    pub fn add_funds(&mut self, caller: &PartyId, funds: Funds) -> Result<(), EscrowError> {
        ensure_customer(self, caller, "add_funds")?;
        self.escrow.deposit(funds)
    }

    /// Claim the record as its store for the current cycle
    pub fn accept(&mut self, caller: &PartyId) -> Result<(), EscrowError> {
        self.state = self.state.next(
            self.id,
            Event::Accept {
                store: caller.clone(),
            },
        )?;
        Ok(())
    }

    /// Mark the order delivered; only the store, only before the deadline
    pub fn fulfill(&mut self, caller: &PartyId, now: Timestamp) -> Result<(), EscrowError> {
        ensure_store(self, caller, "fulfill")?;
        let next = self.state.next(self.id, Event::Fulfill)?;
        ensure_before_deadline(self, now)?;
        self.state = next;
        Ok(())
    }

    /// Raise a dispute on the current cycle
    pub fn dispute(&mut self, caller: &PartyId) -> Result<(), EscrowError> {
        ensure_customer(self, caller, "dispute")?;
        self.state = self.state.next(self.id, Event::Dispute)?;
        Ok(())
    }

    /// Pay the whole escrow to the store and issue a review to the customer
    ///
    /// Requires a fulfilled, undisputed record, `now` strictly after the
    /// deadline, and a non-empty escrow.
    pub fn release_payment(
        &mut self,
        caller: &PartyId,
        review: String,
        now: Timestamp,
    ) -> Result<Release, EscrowError> {
        ensure_customer(self, caller, "release_payment")?;
        let next = self.state.next(self.id, Event::ReleasePayment)?;
        ensure_after_deadline(self, now)?;
        if self.escrow.is_empty() {
            return Err(EscrowError::EmptyEscrow { tx: self.id });
        }

        let store = self.payee_store()?;
        let funds = self.escrow.withdraw_all();
        self.state = next;

        Ok(Release {
            payout: Payout {
                recipient: store,
                funds,
            },
            review: BookReview {
                transaction: self.id,
                customer: self.customer.clone(),
                book: self.book.clone(),
                text: review,
            },
        })
    }

    /// Abandon the current cycle
    ///
    /// An accepted record refunds its escrow to the customer; an open record
    /// moves no funds. Either party may cancel.
    pub fn cancel(&mut self, caller: &PartyId) -> Result<Option<Payout>, EscrowError> {
        ensure_party(self, caller, "cancel")?;
        let next = self.state.next(self.id, Event::Cancel)?;

        let refund = if matches!(self.state, TransactionState::Accepted { .. }) {
            Some(self.refund_customer())
        } else {
            None
        };
        self.state = next;
        Ok(refund)
    }

    /// Return the whole escrow to the customer before delivery or dispute
    pub fn request_refund(&mut self, caller: &PartyId) -> Result<Payout, EscrowError> {
        ensure_customer(self, caller, "request_refund")?;
        self.state = self.state.next(self.id, Event::RequestRefund)?;
        Ok(self.refund_customer())
    }

    /// Rate the purchase from 1 to 5
    pub fn rate(&mut self, caller: &PartyId, rating: u8) -> Result<(), EscrowError> {
        ensure_customer(self, caller, "rate")?;
        if !(1..=5).contains(&rating) {
            return Err(EscrowError::InvalidRating { rating });
        }
        self.rating = Some(rating);
        Ok(())
    }

    pub fn update_book(&mut self, caller: &PartyId, book: BookId) -> Result<(), EscrowError> {
        ensure_customer(self, caller, "update_book")?;
        self.book = book;
        Ok(())
    }

    // TODO: price, quantity and deadline stay editable after a store accepted;
    // decide whether they should lock once the record leaves Open.
    pub fn update_price(&mut self, caller: &PartyId, price: Amount) -> Result<(), EscrowError> {
        ensure_customer(self, caller, "update_price")?;
        self.price = price;
        Ok(())
    }

    pub fn update_quantity(&mut self, caller: &PartyId, quantity: u32) -> Result<(), EscrowError> {
        ensure_customer(self, caller, "update_quantity")?;
        self.quantity = quantity;
        Ok(())
    }

    pub fn update_deadline(
        &mut self,
        caller: &PartyId,
        deadline: Timestamp,
    ) -> Result<(), EscrowError> {
        ensure_customer(self, caller, "update_deadline")?;
        self.deadline = deadline;
        Ok(())
    }

    pub fn update_status(&mut self, caller: &PartyId, status: String) -> Result<(), EscrowError> {
        ensure_customer(self, caller, "update_status")?;
        self.status = status;
        Ok(())
    }

    /// Drain the escrow into a payout for the customer
    pub(crate) fn refund_customer(&mut self) -> Payout {
        Payout {
            recipient: self.customer.clone(),
            funds: self.escrow.withdraw_all(),
        }
    }

    /// The store that receives a store-side payout in the current cycle
    pub(crate) fn payee_store(&self) -> Result<PartyId, EscrowError> {
        self.store()
            .cloned()
            .ok_or_else(|| EscrowError::no_store_assigned(self.id, "payout"))
    }
}
