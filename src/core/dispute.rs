//! Dispute resolution
//!
//! Arbitration is a constrained entry point on a disputed record rather than a
//! separate object. Only the customer can settle a dispute; the whole escrow
//! goes to the party named by the [`Resolution`].

use crate::core::guards::ensure_customer;
use crate::core::state::Event;
use crate::types::{EscrowError, PartyId, Payout, Resolution, TransactionRecord};

impl TransactionRecord {
    /// Settle a dispute and drain the escrow to the winning party
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the caller is not the customer
    /// - `NotDisputed` if the record is not under dispute
    pub fn resolve_dispute(
        &mut self,
        caller: &PartyId,
        resolution: Resolution,
    ) -> Result<Payout, EscrowError> {
        ensure_customer(self, caller, "resolve_dispute")?;
        let next = self.state.next(self.id, Event::ResolveDispute)?;

        let recipient = match resolution {
            Resolution::InFavorOfCustomer => self.customer.clone(),
            Resolution::InFavorOfStore => self.payee_store()?,
        };
        let funds = self.escrow.withdraw_all();
        self.state = next;

        Ok(Payout { recipient, funds })
    }
}
