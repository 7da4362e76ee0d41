use chrono::NaiveDate;
use thiserror::Error;

/// Errors specific to currency conversion.
#[derive(Debug, Error, PartialEq)]
pub enum FxError {
    #[error("No exchange rate for {from}/{to} on or before {date}")]
    RateUnavailable {
        from: String,
        to: String,
        date: NaiveDate,
    },

    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),
}
