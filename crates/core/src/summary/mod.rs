//! Summary module - income and expense totals over date windows.

mod summary_model;
mod summary_service;

pub use summary_model::{PeriodSummary, PeriodSummaryKey};
pub use summary_service::{SummaryService, SummaryServiceTrait};
