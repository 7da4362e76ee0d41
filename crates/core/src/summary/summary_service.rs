//! Service totalling income and expense flows over date windows.

use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use log::debug;

use super::summary_model::{PeriodSummary, PeriodSummaryKey};
use crate::cache::{ComputeCache, GenerationClock};
use crate::errors::Result;
use crate::fx::FxServiceTrait;
use crate::ledger::{DateRange, FlowKind, LedgerReaderTrait};
use crate::money::Money;

/// Trait defining the contract for period summary operations.
pub trait SummaryServiceTrait: Send + Sync {
    /// Total of `kind` flows inside `[start, end)`, each occurrence
    /// converted to the reference currency at its own date. Recurring
    /// records contribute one occurrence per interval boundary inside the
    /// window.
    fn period_summary(
        &self,
        kind: FlowKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PeriodSummary>;
}

/// Cached flow totals over the ledger.
pub struct SummaryService {
    ledger: Arc<dyn LedgerReaderTrait>,
    fx: Arc<dyn FxServiceTrait>,
    base_currency: Arc<RwLock<String>>,
    income_summaries: ComputeCache<PeriodSummaryKey, PeriodSummary>,
    expense_summaries: ComputeCache<PeriodSummaryKey, PeriodSummary>,
}

impl SummaryService {
    pub fn new(
        ledger: Arc<dyn LedgerReaderTrait>,
        fx: Arc<dyn FxServiceTrait>,
        base_currency: Arc<RwLock<String>>,
        clock: Arc<GenerationClock>,
    ) -> Self {
        Self {
            ledger,
            fx,
            base_currency,
            income_summaries: ComputeCache::new(
                Arc::clone(&clock),
                PeriodSummaryKey::depends_on(FlowKind::Income),
            ),
            expense_summaries: ComputeCache::new(
                clock,
                PeriodSummaryKey::depends_on(FlowKind::Expense),
            ),
        }
    }

    fn cache_for(&self, kind: FlowKind) -> &ComputeCache<PeriodSummaryKey, PeriodSummary> {
        match kind {
            FlowKind::Income => &self.income_summaries,
            FlowKind::Expense => &self.expense_summaries,
        }
    }

    fn compute_summary(&self, kind: FlowKind, range: DateRange) -> Result<PeriodSummary> {
        let base_currency = self.base_currency.read().unwrap().clone();

        let mut total = Money::zero(&base_currency);
        let mut occurrences = 0usize;

        // 1. One-off records dated inside the window.
        for record in self.ledger.flows_in(kind, &range)? {
            let converted = self
                .fx
                .convert(&record.amount_money(), &base_currency, record.date)?;
            total = total.try_add(&converted)?;
            occurrences += 1;
        }

        // 2. Recurring records, one occurrence per interval boundary inside
        //    the window, each converted at its own occurrence date.
        for record in self.ledger.recurring_flows(kind)? {
            let recurrence = match record.recurrence {
                Some(recurrence) => recurrence,
                None => continue,
            };
            for occurrence_date in recurrence.occurrences_between(record.date, &range) {
                let converted =
                    self.fx
                        .convert(&record.amount_money(), &base_currency, occurrence_date)?;
                total = total.try_add(&converted)?;
                occurrences += 1;
            }
        }

        Ok(PeriodSummary {
            kind,
            start: range.start(),
            end: range.end(),
            total,
            occurrences,
        })
    }
}

impl SummaryServiceTrait for SummaryService {
    fn period_summary(
        &self,
        kind: FlowKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PeriodSummary> {
        debug!("Period summary requested: {:?} {} to {}", kind, start, end);
        let range = DateRange::new(start, end)?;
        let key = PeriodSummaryKey { kind, range };
        self.cache_for(kind)
            .get_or_compute(key, || self.compute_summary(kind, range))
    }
}
