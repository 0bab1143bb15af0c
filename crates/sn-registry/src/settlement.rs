//! Account balance ledger: the value side of a purchase.
//!
//! # Purpose
//! [`Accounts`] holds the balances the registry settles against.  The
//! execution environment (testkit harness, CLI) provisions accounts and
//! charges its own processing costs through this ledger; the registry's
//! purchase operation moves the listing price through [`Accounts::transfer`].
//!
//! # Invariants
//! - A transfer debits and credits the same exact amount, or does nothing.
//! - Balances never go negative; a shortfall rejects the whole operation.
//! - All arithmetic is checked; overflow rejects rather than wraps.
//!
//! # Determinism
//! `Accounts` is deterministic and pure: no IO, no time, no randomness.

use std::collections::BTreeMap;

use crate::money::Amount;
use crate::types::AccountId;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// All failures the settlement ledger can surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    /// The account has never been opened.
    UnknownAccount { account: AccountId },
    /// The debit side cannot cover the requested amount.
    InsufficientFunds {
        account: AccountId,
        balance: Amount,
        required: Amount,
    },
    /// A credit or deposit amount was negative.
    NegativeAmount { amount: Amount },
    /// The credit side would overflow the representable range.
    Overflow,
}

impl std::fmt::Display for SettlementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownAccount { account } => {
                write!(f, "unknown account: {account}")
            }
            Self::InsufficientFunds {
                account,
                balance,
                required,
            } => write!(
                f,
                "insufficient funds: account {account} holds {balance}, needs {required}"
            ),
            Self::NegativeAmount { amount } => {
                write!(f, "settlement amount must be >= 0, got {amount}")
            }
            Self::Overflow => write!(f, "settlement would overflow the value range"),
        }
    }
}

impl std::error::Error for SettlementError {}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// The balance ledger: `AccountId -> Amount`, all mutations checked and
/// all-or-nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Accounts {
    balances: BTreeMap<AccountId, Amount>,
}

impl Accounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an account with a zero balance.  Opening an existing account is
    /// a no-op (the balance is preserved).
    pub fn open(&mut self, account: AccountId) {
        self.balances.entry(account).or_insert(Amount::ZERO);
    }

    /// `true` if the account has been opened.
    pub fn contains(&self, account: &AccountId) -> bool {
        self.balances.contains_key(account)
    }

    /// Current balance.  Unknown accounts are an error, never a silent zero.
    pub fn balance(&self, account: &AccountId) -> Result<Amount, SettlementError> {
        self.balances
            .get(account)
            .copied()
            .ok_or_else(|| SettlementError::UnknownAccount {
                account: account.clone(),
            })
    }

    /// Credit an opened account.  Rejects negative amounts and overflow.
    pub fn deposit(&mut self, account: &AccountId, amount: Amount) -> Result<(), SettlementError> {
        if amount.is_negative() {
            return Err(SettlementError::NegativeAmount { amount });
        }
        let balance = self.balance(account)?;
        let next = balance.checked_add(amount).ok_or(SettlementError::Overflow)?;
        self.balances.insert(account.clone(), next);
        Ok(())
    }

    /// Debit an opened account (the environment's processing-cost sink).
    /// Rejects negative amounts and shortfalls.
    pub fn withdraw(&mut self, account: &AccountId, amount: Amount) -> Result<(), SettlementError> {
        if amount.is_negative() {
            return Err(SettlementError::NegativeAmount { amount });
        }
        let balance = self.balance(account)?;
        if balance < amount {
            return Err(SettlementError::InsufficientFunds {
                account: account.clone(),
                balance,
                required: amount,
            });
        }
        self.balances.insert(account.clone(), balance - amount);
        Ok(())
    }

    /// Move exactly `amount` from `from` to `to`.
    ///
    /// Two-phase: both sides are validated (existence, funds, overflow)
    /// before either balance mutates, so the ledger is **not** touched on
    /// error.
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), SettlementError> {
        if amount.is_negative() {
            return Err(SettlementError::NegativeAmount { amount });
        }
        let from_balance = self.balance(from)?;
        let to_balance = self.balance(to)?;
        if from_balance < amount {
            return Err(SettlementError::InsufficientFunds {
                account: from.clone(),
                balance: from_balance,
                required: amount,
            });
        }
        let to_next = to_balance
            .checked_add(amount)
            .ok_or(SettlementError::Overflow)?;

        self.balances.insert(from.clone(), from_balance - amount);
        self.balances.insert(to.clone(), to_next);
        Ok(())
    }

    /// Sum of all balances, for conservation checks in tests and audits.
    ///
    /// `None` if the sum overflows (possible only with artificially large
    /// fixtures; real genesis allocations are far below the range).
    pub fn total(&self) -> Option<Amount> {
        self.balances
            .values()
            .try_fold(Amount::ZERO, |acc, b| acc.checked_add(*b))
    }

    /// Read-only view of every balance.
    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, Amount)> {
        self.balances.iter().map(|(id, b)| (id, *b))
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
