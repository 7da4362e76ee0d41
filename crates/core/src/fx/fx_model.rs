use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fx_errors::FxError;
use crate::errors::{Error, Result};
use crate::ledger::EntityKind;

/// A manually recorded rate: on `date`, one unit of `from_currency` bought
/// `rate` units of `to_currency`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub id: String,
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
    pub date: NaiveDate,
}

impl ExchangeRate {
    pub fn new(
        from_currency: impl Into<String>,
        to_currency: impl Into<String>,
        rate: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            from_currency: from_currency.into(),
            to_currency: to_currency.into(),
            rate,
            date,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_currency_code(&self.from_currency)?;
        validate_currency_code(&self.to_currency)?;
        if self.rate <= Decimal::ZERO {
            return Err(Error::Validation(format!(
                "Exchange rate {}/{} must be positive, got {}",
                self.from_currency, self.to_currency, self.rate
            )));
        }
        Ok(())
    }
}

/// Cache key for the assembled rate book. A single book covers every
/// recorded pair, so the key carries no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RateBookKey;

impl RateBookKey {
    pub const DEPENDS_ON: &'static [EntityKind] = &[EntityKind::ExchangeRate];
}

pub(super) fn validate_currency_code(code: &str) -> std::result::Result<(), FxError> {
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(FxError::InvalidCurrencyCode(code.to_string()))
    }
}
