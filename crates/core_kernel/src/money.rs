//! Value types for escrowed funds
//!
//! Amounts are whole units of the ledger's native coin. Two representations
//! exist:
//! - [`Balance`]: value held *inside* the ledger (account or treasury escrow)
//! - [`Coin`]: value held by an external party, entering or leaving the ledger
//!
//! All arithmetic is checked. Overflow and insufficient funds are reported
//! as errors instead of wrapping.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Funds held inside the ledger
///
/// A balance can never be negative: [`Balance::split`] fails instead of
/// going below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance {
    value: u64,
}

impl Balance {
    /// Creates an empty balance
    pub const fn zero() -> Self {
        Self { value: 0 }
    }

    /// Creates a balance holding `value`
    pub const fn new(value: u64) -> Self {
        Self { value }
    }

    /// Returns the held amount
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Returns true if nothing is held
    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Returns true if at least `amount` is held
    pub fn covers(&self, amount: u64) -> bool {
        self.value >= amount
    }

    /// Checked addition
    pub fn checked_add(&self, other: Balance) -> Result<Balance, CoreError> {
        self.value
            .checked_add(other.value)
            .map(Balance::new)
            .ok_or_else(|| CoreError::overflow(format!("{} + {}", self.value, other.value)))
    }

    /// Checked subtraction that fails with `InsufficientFunds`
    pub fn checked_sub(&self, amount: u64) -> Result<Balance, CoreError> {
        self.value
            .checked_sub(amount)
            .map(Balance::new)
            .ok_or(CoreError::InsufficientFunds {
                available: self.value,
                requested: amount,
            })
    }

    /// Merges `other` into this balance
    ///
    /// On overflow the balance is left unchanged.
    pub fn join(&mut self, other: Balance) -> Result<(), CoreError> {
        *self = self.checked_add(other)?;
        Ok(())
    }

    /// Takes `amount` out of this balance
    ///
    /// On insufficient funds the balance is left unchanged.
    pub fn split(&mut self, amount: u64) -> Result<Balance, CoreError> {
        *self = self.checked_sub(amount)?;
        Ok(Balance::new(amount))
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Value owned by a party outside the ledger
///
/// Coins are deliberately not `Clone`: value can only be moved into a
/// [`Balance`] or produced from one.
#[derive(Debug, PartialEq, Eq)]
pub struct Coin {
    value: u64,
}

impl Coin {
    /// Wraps externally supplied value
    pub fn new(value: u64) -> Self {
        Self { value }
    }

    /// Converts a ledger balance into an external coin
    pub fn from_balance(balance: Balance) -> Self {
        Self { value: balance.value() }
    }

    /// Converts this coin into a ledger balance
    pub fn into_balance(self) -> Balance {
        Balance::new(self.value)
    }

    /// Returns the coin's value
    pub fn value(&self) -> u64 {
        self.value
    }
}

/// Represents a percentage rate (e.g., a late-fee rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// The rate as a decimal (e.g., 0.05 for 5%)
    value: Decimal,
}

impl Rate {
    /// Creates a rate from a whole percentage (e.g., 5 for 5%)
    pub fn from_percentage(percentage: u64) -> Self {
        Self {
            value: Decimal::from(percentage) / dec!(100),
        }
    }

    /// Returns the rate as a decimal
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Returns the rate as a percentage
    pub fn as_percentage(&self) -> Decimal {
        self.value * dec!(100)
    }

    /// Applies this rate to a whole amount, rounding down
    pub fn apply(&self, amount: u64) -> Result<u64, CoreError> {
        let overflow = || CoreError::overflow(format!("{} * {}", amount, self));
        Decimal::from(amount)
            .checked_mul(self.value)
            .ok_or_else(overflow)?
            .floor()
            .to_u64()
            .ok_or_else(overflow)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}
