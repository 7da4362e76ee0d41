//! Forecast module - monthly projections, the retirement date search, and
//! readiness against a safe-withdrawal target.

mod forecast_model;
mod forecast_service;
mod projection;

// Re-export the public interface
pub use forecast_model::{
    Assumptions, ForecastError, ProjectedBalance, ProjectionState, RetirementPlan,
    RetirementReadiness,
};
pub use forecast_service::{ForecastService, ForecastServiceTrait};
pub use projection::{monthly_rate, ProjectionIter};
