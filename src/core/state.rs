//! Lifecycle transition table
//!
//! Every state change of a transaction record is validated here and nowhere
//! else. Callers authorize first, ask [`TransactionState::next`] for the target
//! state, move funds, and only then commit the returned state.

use crate::types::{EscrowError, PartyId, TransactionId, TransactionState};

/// Lifecycle events that change a record's state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Accept { store: PartyId },
    Fulfill,
    Dispute,
    ResolveDispute,
    ReleasePayment,
    RequestRefund,
    Cancel,
}

impl Event {
    pub fn operation(&self) -> &'static str {
        match self {
            Event::Accept { .. } => "accept",
            Event::Fulfill => "fulfill",
            Event::Dispute => "dispute",
            Event::ResolveDispute => "resolve_dispute",
            Event::ReleasePayment => "release_payment",
            Event::RequestRefund => "request_refund",
            Event::Cancel => "cancel",
        }
    }
}

impl TransactionState {
    /// Compute the state reached by applying `event`
    ///
    /// Does not mutate `self`; returns an error describing why the event is not
    /// allowed in the current state.
    pub fn next(&self, tx: TransactionId, event: Event) -> Result<TransactionState, EscrowError> {
        use TransactionState::*;

        let operation = event.operation();
        match (self, event) {
            (Open, Event::Accept { store }) => Ok(Accepted { store }),
            (
                Accepted { store } | Fulfilled { store } | Disputed { store, .. },
                Event::Accept { .. },
            ) => Err(EscrowError::store_already_assigned(tx, store)),

            (Accepted { store }, Event::Fulfill) => Ok(Fulfilled {
                store: store.clone(),
            }),
            (Open, Event::Fulfill) => Err(EscrowError::no_store_assigned(tx, operation)),
            (Fulfilled { .. }, Event::Fulfill) => {
                Err(EscrowError::already_fulfilled(tx, operation))
            }
            (Disputed { .. }, Event::Fulfill) => Err(EscrowError::already_disputed(tx, operation)),

            (Accepted { store }, Event::Dispute) => Ok(Disputed {
                store: store.clone(),
                fulfilled: false,
            }),
            (Fulfilled { store }, Event::Dispute) => Ok(Disputed {
                store: store.clone(),
                fulfilled: true,
            }),
            (Open, Event::Dispute) => Err(EscrowError::no_store_assigned(tx, operation)),
            (Disputed { .. }, Event::Dispute) => Err(EscrowError::already_disputed(tx, operation)),

            (Disputed { .. }, Event::ResolveDispute) => Ok(Open),
            (_, Event::ResolveDispute) => Err(EscrowError::not_disputed(tx, operation)),

            (Fulfilled { .. }, Event::ReleasePayment) => Ok(Open),
            (Open, Event::ReleasePayment) => Err(EscrowError::no_store_assigned(tx, operation)),
            (Accepted { .. }, Event::ReleasePayment) => {
                Err(EscrowError::not_fulfilled(tx, operation))
            }
            (Disputed { .. }, Event::ReleasePayment) => {
                Err(EscrowError::already_disputed(tx, operation))
            }

            (Open | Accepted { .. }, Event::RequestRefund | Event::Cancel) => Ok(Open),
            (Fulfilled { .. }, Event::RequestRefund | Event::Cancel) => {
                Err(EscrowError::already_fulfilled(tx, operation))
            }
            (Disputed { .. }, Event::RequestRefund | Event::Cancel) => {
                Err(EscrowError::already_disputed(tx, operation))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;
    use rstest::rstest;

    fn shop() -> PartyId {
        PartyId::from("shop")
    }

    fn open() -> TransactionState {
        TransactionState::Open
    }

    fn accepted() -> TransactionState {
        TransactionState::Accepted { store: shop() }
    }

    fn fulfilled() -> TransactionState {
        TransactionState::Fulfilled { store: shop() }
    }

    fn disputed(fulfilled: bool) -> TransactionState {
        TransactionState::Disputed {
            store: shop(),
            fulfilled,
        }
    }

    #[rstest]
    #[case::accept(open(), Event::Accept { store: shop() }, accepted())]
    #[case::fulfill(accepted(), Event::Fulfill, fulfilled())]
    #[case::dispute_before_delivery(accepted(), Event::Dispute, disputed(false))]
    #[case::dispute_after_delivery(fulfilled(), Event::Dispute, disputed(true))]
    #[case::resolve(disputed(false), Event::ResolveDispute, open())]
    #[case::resolve_after_delivery(disputed(true), Event::ResolveDispute, open())]
    #[case::release(fulfilled(), Event::ReleasePayment, open())]
    #[case::refund_open(open(), Event::RequestRefund, open())]
    #[case::refund_accepted(accepted(), Event::RequestRefund, open())]
    #[case::cancel_open(open(), Event::Cancel, open())]
    #[case::cancel_accepted(accepted(), Event::Cancel, open())]
    fn test_allowed_transitions(
        #[case] from: TransactionState,
        #[case] event: Event,
        #[case] to: TransactionState,
    ) {
        assert_eq!(from.next(1, event).unwrap(), to);
    }

    #[rstest]
    #[case::accept_accepted(accepted(), Event::Accept { store: PartyId::from("other") })]
    #[case::accept_fulfilled(fulfilled(), Event::Accept { store: PartyId::from("other") })]
    #[case::accept_disputed(disputed(false), Event::Accept { store: PartyId::from("other") })]
    #[case::fulfill_open(open(), Event::Fulfill)]
    #[case::fulfill_twice(fulfilled(), Event::Fulfill)]
    #[case::fulfill_disputed(disputed(false), Event::Fulfill)]
    #[case::dispute_open(open(), Event::Dispute)]
    #[case::dispute_twice(disputed(true), Event::Dispute)]
    #[case::resolve_open(open(), Event::ResolveDispute)]
    #[case::resolve_accepted(accepted(), Event::ResolveDispute)]
    #[case::resolve_fulfilled(fulfilled(), Event::ResolveDispute)]
    #[case::release_open(open(), Event::ReleasePayment)]
    #[case::release_accepted(accepted(), Event::ReleasePayment)]
    #[case::release_disputed(disputed(true), Event::ReleasePayment)]
    #[case::refund_fulfilled(fulfilled(), Event::RequestRefund)]
    #[case::refund_disputed(disputed(false), Event::RequestRefund)]
    #[case::cancel_fulfilled(fulfilled(), Event::Cancel)]
    #[case::cancel_disputed(disputed(true), Event::Cancel)]
    fn test_rejected_transitions(#[case] from: TransactionState, #[case] event: Event) {
        let err = from.next(1, event).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn test_accept_reports_current_store() {
        let err = accepted()
            .next(
                4,
                Event::Accept {
                    store: PartyId::from("late"),
                },
            )
            .unwrap_err();
        assert_eq!(
            err,
            EscrowError::StoreAlreadyAssigned {
                tx: 4,
                store: shop()
            }
        );
    }
}
