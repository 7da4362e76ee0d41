//! Valuation module - net worth and asset allocation aggregations.

mod valuation_calculator;
mod valuation_model;
mod valuation_service;

pub use valuation_model::{AllocationKey, AllocationSlice, AssetAllocation, NetWorthKey};
pub use valuation_service::{ValuationService, ValuationServiceTrait};
