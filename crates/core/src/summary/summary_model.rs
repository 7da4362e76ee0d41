//! Period summary domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::{DateRange, EntityKind, FlowKind};
use crate::money::Money;

/// Cache key for one period summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeriodSummaryKey {
    pub kind: FlowKind,
    pub range: DateRange,
}

impl PeriodSummaryKey {
    /// Entity kinds summaries of `kind` depend on. Income totals are
    /// untouched by expense writes and vice versa.
    pub fn depends_on(kind: FlowKind) -> &'static [EntityKind] {
        match kind {
            FlowKind::Income => &[EntityKind::Income, EntityKind::ExchangeRate],
            FlowKind::Expense => &[EntityKind::Expense, EntityKind::ExchangeRate],
        }
    }
}

/// Total of one flow kind over a half-open window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    /// Which flow kind was totalled
    pub kind: FlowKind,
    /// Window start (inclusive)
    pub start: NaiveDate,
    /// Window end (exclusive)
    pub end: NaiveDate,
    /// Total in the reference currency
    pub total: Money,
    /// Contributing occurrences, recurring expansions included
    pub occurrences: usize,
}
