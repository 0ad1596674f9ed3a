use crate::error::{BankError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

pub type AccountId = u64;

/// Monetary value held by an account.
///
/// Wraps `rust_decimal::Decimal` so balances and transfer amounts cannot be
/// mixed up by accident.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

/// A strictly positive amount of money moved by a transfer.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(BankError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = BankError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// A bank account owned by a single user.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Account {
    pub id: AccountId,
    /// Username of the owner; only the owner may send funds from the account.
    pub username: String,
    pub balance: Balance,
}

impl Account {
    pub fn new(id: AccountId, username: impl Into<String>, balance: Balance) -> Self {
        Self {
            id,
            username: username.into(),
            balance,
        }
    }

    pub fn is_owned_by(&self, username: &str) -> bool {
        self.username == username
    }

    /// Takes funds out of the account if the balance covers them.
    pub fn debit(&mut self, amount: Amount) -> Result<()> {
        let amount = Balance::from(amount);
        if self.balance < amount {
            return Err(BankError::InsufficientFunds { id: self.id });
        }
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(BankError::BalanceOverflow { id: self.id })?;
        Ok(())
    }

    /// Adds funds, failing if the balance would exceed `Decimal::MAX`.
    pub fn credit(&mut self, amount: Amount) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(amount.into())
            .ok_or(BankError::BalanceOverflow { id: self.id })?;
        Ok(())
    }
}
