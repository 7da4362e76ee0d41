use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::rate_book::RateBook;
use crate::errors::Result;
use crate::money::Money;

/// Trait defining the contract for currency conversion operations.
pub trait FxServiceTrait: Send + Sync {
    fn rate_book(&self) -> Result<Arc<RateBook>>;
    fn exchange_rate(&self, from_currency: &str, to_currency: &str, date: NaiveDate)
        -> Result<Decimal>;
    fn convert(&self, money: &Money, to_currency: &str, date: NaiveDate) -> Result<Money>;
}
