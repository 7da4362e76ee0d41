//! Fixed-precision monetary value with currency-aware arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

use crate::constants::DISPLAY_DECIMAL_PRECISION;

/// Errors raised by monetary arithmetic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: String, right: String },

    #[error("Amount overflow during {0}")]
    Overflow(&'static str),
}

/// An immutable amount in a specific currency.
///
/// Arithmetic between two values is defined only when both share a currency;
/// mixing currencies fails with [`MoneyError::CurrencyMismatch`] instead of
/// being coerced. Moving an amount between currencies is the fx module's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    /// Creates a new monetary value.
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    /// Zero in the given currency.
    pub fn zero(currency: impl Into<String>) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency.clone(),
                right: other.currency.clone(),
            });
        }
        Ok(())
    }

    /// Adds a value of the same currency.
    pub fn try_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(MoneyError::Overflow("add"))?;
        Ok(Money::new(amount, &self.currency))
    }

    /// Subtracts a value of the same currency.
    pub fn try_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or(MoneyError::Overflow("subtract"))?;
        Ok(Money::new(amount, &self.currency))
    }

    /// Scales the amount by a plain decimal factor, keeping the currency.
    pub fn mul_scalar(&self, factor: Decimal) -> Result<Money, MoneyError> {
        let amount = self
            .amount
            .checked_mul(factor)
            .ok_or(MoneyError::Overflow("multiply"))?;
        Ok(Money::new(amount, &self.currency))
    }

    /// Compares two values of the same currency.
    pub fn try_cmp(&self, other: &Money) -> Result<Ordering, MoneyError> {
        self.ensure_same_currency(other)?;
        Ok(self.amount.cmp(&other.amount))
    }

    /// Sums values into the given currency, refusing mixed-currency input.
    pub fn sum<'a, I>(currency: &str, values: I) -> Result<Money, MoneyError>
    where
        I: IntoIterator<Item = &'a Money>,
    {
        let mut total = Money::zero(currency);
        for value in values {
            total = total.try_add(value)?;
        }
        Ok(total)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.amount.round_dp(DISPLAY_DECIMAL_PRECISION),
            self.currency
        )
    }
}
