//! Escrow custody types
//!
//! `EscrowAccount` is the leaf of the ledger: it holds a balance and offers
//! deposit/withdraw primitives with no business rules. Funds cross the boundary
//! between the host ledger and an escrow as `Funds` values.

use super::error::EscrowError;
use super::party::{Amount, PartyId};

/// An amount of currency in transit between the host ledger and an escrow
#[must_use = "funds must be deposited or paid out"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Funds {
    amount: Amount,
}

impl Funds {
    /// Wrap an amount supplied by the host ledger
    pub fn new(amount: Amount) -> Self {
        Funds { amount }
    }

    pub fn zero() -> Self {
        Funds { amount: 0 }
    }

    pub fn value(&self) -> Amount {
        self.amount
    }
}

/// Funds leaving an escrow together with the party they belong to
#[must_use = "a payout must be settled with the host ledger"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    pub recipient: PartyId,
    pub funds: Funds,
}

impl Payout {
    pub fn amount(&self) -> Amount {
        self.funds.value()
    }
}

/// Balance held on behalf of exactly one transaction record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EscrowAccount {
    balance: Amount,
}

impl EscrowAccount {
    /// Create an empty escrow
    pub fn new() -> Self {
        EscrowAccount { balance: 0 }
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn is_empty(&self) -> bool {
        self.balance == 0
    }

    /// Add funds to the balance
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if the balance would exceed `u64::MAX`.
    pub fn deposit(&mut self, funds: Funds) -> Result<(), EscrowError> {
        self.balance = self
            .balance
            .checked_add(funds.value())
            .ok_or_else(|| EscrowError::arithmetic_overflow("escrow deposit"))?;
        Ok(())
    }

    /// Remove exactly `amount` from the balance
    ///
    /// # Errors
    ///
    /// Returns `InsufficientFunds` if `amount` exceeds the current balance. The
    /// balance is left untouched in that case.
    pub fn withdraw(&mut self, amount: Amount) -> Result<Funds, EscrowError> {
        if amount > self.balance {
            return Err(EscrowError::insufficient_funds(self.balance, amount));
        }
        self.balance -= amount;
        Ok(Funds::new(amount))
    }

    /// Drain the whole balance
    pub fn withdraw_all(&mut self) -> Funds {
        let funds = Funds::new(self.balance);
        self.balance = 0;
        funds
    }
}
