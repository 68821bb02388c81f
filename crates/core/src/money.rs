//! Money and quantity value objects.
//!
//! Amounts are integer cents (smallest currency unit). BSON has no unsigned
//! 64-bit integer, so `i64` is used end to end and non-negativity is enforced
//! at the construction sites that need it.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// An amount of money in integer cents.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// A price or cost: must be non-negative.
    pub fn non_negative(cents: i64) -> DomainResult<Self> {
        if cents < 0 {
            return Err(DomainError::validation(format!(
                "amount must be non-negative, got {cents}"
            )));
        }
        Ok(Self(cents))
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn checked_add(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::invariant("money addition overflowed"))
    }

    /// Multiply a unit amount by a quantity (e.g. price × units sold).
    pub fn checked_mul(self, quantity: Quantity) -> DomainResult<Money> {
        self.0
            .checked_mul(quantity.get())
            .map(Money)
            .ok_or_else(|| DomainError::invariant("money multiplication overflowed"))
    }
}

impl ValueObject for Money {}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

/// A strictly positive unit count (sales and purchases never move zero units).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    pub fn new(units: i64) -> DomainResult<Self> {
        if units <= 0 {
            return Err(DomainError::validation(format!(
                "quantity must be positive, got {units}"
            )));
        }
        Ok(Self(units))
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl ValueObject for Quantity {}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
