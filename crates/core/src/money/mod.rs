//! Money module - currency-safe monetary values.

mod money_model;

#[cfg(test)]
mod money_model_tests;

// Re-export the public interface
pub use money_model::{Money, MoneyError};
