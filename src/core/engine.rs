//! Command replay engine
//!
//! This module provides the EscrowEngine that plays the host: it applies each
//! command to the addressed record through the TransactionRegistry and settles
//! the funds the operation releases into the PartyLedger. An engine built with
//! a Catalog also tallies every committed rating there.
//!
//! The engine enforces:
//! - One record per transaction ID (`create` never overwrites)
//! - Atomic commits per record (a failed command leaves no trace)
//! - Settlement only after the record change has been committed

use crate::core::catalog::Catalog;
use crate::core::ledger::PartyLedger;
use crate::core::registry::TransactionRegistry;
use crate::core::traits::{LedgerSink, Settlement};
use crate::types::{
    Action, EscrowCommand, EscrowError, Funds, PartyBalance, PartyId, Timestamp,
    TransactionRecord,
};
use tracing::debug;

/// Final state of a replay, sorted for output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    /// Every record, sorted by transaction ID
    pub transactions: Vec<TransactionRecord>,

    /// Every party that moved or received funds, sorted by party ID
    pub parties: Vec<PartyBalance>,
}

/// Apply one non-create action to an existing record
///
/// Shared by the sync and async engines so both route every operation through
/// the same dispatch. `Create` addressed to an existing record is a duplicate.
pub(crate) fn apply_action(
    record: &mut TransactionRecord,
    caller: &PartyId,
    now: Timestamp,
    action: Action,
) -> Result<Settlement, EscrowError> {
    match action {
        Action::Create { .. } => Err(EscrowError::duplicate_transaction(record.id())),
        Action::AddFunds { amount } => {
            record.add_funds(caller, Funds::new(amount))?;
            Ok(Settlement::Deposit {
                party: caller.clone(),
                amount,
            })
        }
        Action::Accept => record.accept(caller).map(|_| Settlement::None),
        Action::Fulfill => record.fulfill(caller, now).map(|_| Settlement::None),
        Action::Dispute => record.dispute(caller).map(|_| Settlement::None),
        Action::ResolveDispute { resolution } => record
            .resolve_dispute(caller, resolution)
            .map(Settlement::Payout),
        Action::ReleasePayment { review } => record
            .release_payment(caller, review, now)
            .map(Settlement::Release),
        Action::Cancel => record.cancel(caller).map(Settlement::from),
        Action::RequestRefund => record.request_refund(caller).map(Settlement::Payout),
        Action::Rate { rating } => {
            record.rate(caller, rating)?;
            Ok(Settlement::Rating {
                book: record.book().clone(),
                rating,
            })
        }
        Action::UpdateBook { book } => record.update_book(caller, book).map(|_| Settlement::None),
        Action::UpdatePrice { price } => {
            record.update_price(caller, price).map(|_| Settlement::None)
        }
        Action::UpdateQuantity { quantity } => record
            .update_quantity(caller, quantity)
            .map(|_| Settlement::None),
        Action::UpdateDeadline { deadline } => record
            .update_deadline(caller, deadline)
            .map(|_| Settlement::None),
        Action::UpdateStatus { status } => record
            .update_status(caller, status)
            .map(|_| Settlement::None),
    }
}

/// Single-threaded replay engine
pub struct EscrowEngine {
    registry: TransactionRegistry,
    ledger: PartyLedger,
    catalog: Option<Catalog>,
}

impl EscrowEngine {
    /// Create an engine with no records, an empty ledger and no catalog
    pub fn new() -> Self {
        EscrowEngine {
            registry: TransactionRegistry::new(),
            ledger: PartyLedger::new(),
            catalog: None,
        }
    }

    /// Tally ratings into `catalog`
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Process a single command
    ///
    /// # Errors
    ///
    /// Returns the error of the addressed operation, `TransactionNotFound` for
    /// an unknown record, or `DuplicateTransaction` for a `create` on a taken
    /// ID. Neither the registry nor the ledger changes on error.
    pub fn process(&mut self, command: EscrowCommand) -> Result<(), EscrowError> {
        let EscrowCommand {
            tx,
            caller,
            now,
            action,
        } = command;
        let operation = action.name();

        let settlement = match action {
            Action::Create {
                book,
                quantity,
                price,
                duration,
            } => {
                let record = TransactionRecord::create(
                    tx,
                    caller.clone(),
                    book,
                    quantity,
                    price,
                    duration,
                    now,
                );
                self.registry.insert(record)?;
                Settlement::None
            }
            action => self
                .registry
                .update(tx, operation, |record| {
                    apply_action(record, &caller, now, action)
                })?,
        };

        debug!(tx, caller = %caller, operation, "applied command");
        settlement.settle(&mut self.ledger, self.catalog.as_ref());
        Ok(())
    }

    pub fn registry(&self) -> &TransactionRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &PartyLedger {
        &self.ledger
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    /// Sorted copy of every record and party balance
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            transactions: self.registry.get_all().into_iter().cloned().collect(),
            parties: self.ledger.get_all().into_iter().cloned().collect(),
        }
    }
}

impl Default for EscrowEngine {
    fn default() -> Self {
        Self::new()
    }
}
