//! Core error types for the Fortuna engine.
//!
//! This module defines the error taxonomy the serving layer consumes. Module
//! specific errors (money arithmetic, FX lookups, forecasting) live next to
//! their domain and are wrapped here via `#[from]`.

use chrono::NaiveDate;
use thiserror::Error;

use crate::forecast::ForecastError;
use crate::fx::FxError;
use crate::money::MoneyError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
///
/// Every failure is returned to the immediate caller as a typed result; the
/// core never retries and never substitutes defaults for missing data.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Money arithmetic failed: {0}")]
    Money(#[from] MoneyError),

    #[error("Fx error: {0}")]
    Fx(#[from] FxError),

    #[error("Forecast error: {0}")]
    Forecast(#[from] ForecastError),

    #[error("Invalid date range: end {end} must be after start {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Input validation failed: {0}")]
    Validation(String),
}

// === From implementations for common error types ===

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(err.to_string())
    }
}
