//! Authorization and deadline guards
//!
//! Authorization is capability-free: a caller is accepted only when its identity
//! equals the identity stored on the record. Every mutating operation calls one
//! of these guards before looking at anything else, since record state never
//! implies who is allowed to act on it.

use crate::types::{EscrowError, PartyId, Role, Timestamp, TransactionRecord};

/// Require the caller to be the record's customer
pub fn ensure_customer(
    record: &TransactionRecord,
    caller: &PartyId,
    operation: &str,
) -> Result<(), EscrowError> {
    if record.customer() != caller {
        return Err(EscrowError::unauthorized(
            record.id(),
            caller,
            Role::Customer,
            operation,
        ));
    }
    Ok(())
}

/// Require the caller to be the store assigned in the current cycle
///
/// A record with no store assigned rejects every caller.
pub fn ensure_store(
    record: &TransactionRecord,
    caller: &PartyId,
    operation: &str,
) -> Result<(), EscrowError> {
    if record.store() != Some(caller) {
        return Err(EscrowError::unauthorized(
            record.id(),
            caller,
            Role::Store,
            operation,
        ));
    }
    Ok(())
}

/// Require the caller to be either the customer or the assigned store
pub fn ensure_party(
    record: &TransactionRecord,
    caller: &PartyId,
    operation: &str,
) -> Result<(), EscrowError> {
    if record.customer() != caller && record.store() != Some(caller) {
        return Err(EscrowError::unauthorized(
            record.id(),
            caller,
            Role::Party,
            operation,
        ));
    }
    Ok(())
}

/// Require `now` to be strictly before the deadline
pub fn ensure_before_deadline(
    record: &TransactionRecord,
    now: Timestamp,
) -> Result<(), EscrowError> {
    if now >= record.deadline() {
        return Err(EscrowError::DeadlinePassed {
            tx: record.id(),
            now,
            deadline: record.deadline(),
        });
    }
    Ok(())
}

/// Require `now` to be strictly after the deadline
pub fn ensure_after_deadline(
    record: &TransactionRecord,
    now: Timestamp,
) -> Result<(), EscrowError> {
    if now <= record.deadline() {
        return Err(EscrowError::DeadlineNotReached {
            tx: record.id(),
            now,
            deadline: record.deadline(),
        });
    }
    Ok(())
}
