//! Monthly step transition for the projection engine.
//!
//! The transition is a pure function from one [`ProjectionState`] to the
//! next; the service owns the loop and the retirement search built on top
//! of it.

use chrono::Months;
use rust_decimal::{Decimal, MathematicalOps};

use super::forecast_model::{MonthInputs, MonthPhase, ProjectionState};
use crate::constants::MONTHS_PER_YEAR;
use crate::errors::{Error, Result};
use crate::ledger::{AccountKind, DateRange, FlowKind};

/// Monthly rate that compounds to the given annual rate over twelve steps,
/// `(1 + annual)^(1/12) - 1`.
pub fn monthly_rate(annual_rate: Decimal) -> Decimal {
    let exponent = Decimal::ONE / Decimal::from(MONTHS_PER_YEAR);
    (Decimal::ONE + annual_rate).powd(exponent) - Decimal::ONE
}

/// Advances the simulation by one month.
pub(super) fn advance_month(
    state: &ProjectionState,
    inputs: &MonthInputs,
    phase: MonthPhase,
) -> Result<ProjectionState> {
    let next_date = state
        .date
        .checked_add_months(Months::new(1))
        .ok_or_else(|| Error::Validation(format!("projection date overflow past {}", state.date)))?;

    let mut next = state.clone();

    // 1. Market return accrues on invested balances and the asset pool;
    //    cash carries no return.
    for balance in &mut next.balances {
        if balance.kind == AccountKind::Investment {
            balance.balance *= Decimal::ONE + inputs.monthly_return_rate;
        }
    }
    next.invested_assets *= Decimal::ONE + inputs.monthly_return_rate;

    // 2. Scheduled flows while accumulating; the spending target once
    //    retired.
    match phase {
        MonthPhase::Accumulation => {
            let window = DateRange::new(state.date, next_date)?;
            for flow in &inputs.flows {
                let occurrences = flow.recurrence.occurrences_between(flow.anchor, &window);
                if occurrences.is_empty() {
                    continue;
                }
                let total = flow.amount * Decimal::from(occurrences.len());
                match flow.kind {
                    FlowKind::Income => deposit(&mut next, flow.account_id.as_deref(), total),
                    FlowKind::Expense => withdraw(&mut next, total),
                }
            }
        }
        MonthPhase::Drawdown => {
            let spending = next.monthly_spending;
            withdraw(&mut next, spending);
        }
    }

    // 3. Inflation raises next month's spending target.
    next.monthly_spending *= Decimal::ONE + inputs.monthly_inflation_rate;

    // 4. Advance the date.
    next.date = next_date;

    Ok(next)
}

/// Credits income to its target account, falling back to the first cash
/// account and then to the invested pool.
pub(super) fn deposit(state: &mut ProjectionState, account_id: Option<&str>, amount: Decimal) {
    if let Some(id) = account_id {
        if let Some(balance) = state.balances.iter_mut().find(|b| b.account_id == id) {
            balance.balance += amount;
            return;
        }
    }
    if let Some(balance) = state
        .balances
        .iter_mut()
        .find(|b| b.kind == AccountKind::Cash)
    {
        balance.balance += amount;
        return;
    }
    state.invested_assets += amount;
}

/// Debits spending from cash balances first, then invested balances, then
/// the invested pool. The pool absorbs any shortfall and may go negative.
pub(super) fn withdraw(state: &mut ProjectionState, amount: Decimal) {
    let mut remaining = amount;
    for kind in [AccountKind::Cash, AccountKind::Investment] {
        for balance in state.balances.iter_mut().filter(|b| b.kind == kind) {
            if remaining <= Decimal::ZERO {
                return;
            }
            let taken = remaining.min(balance.balance.max(Decimal::ZERO));
            balance.balance -= taken;
            remaining -= taken;
        }
    }
    if remaining > Decimal::ZERO {
        state.invested_assets -= remaining;
    }
}

/// Whether retiring after `candidate_months` of accumulation keeps net
/// worth non-negative at the candidate and through every drawdown month to
/// the horizon.
pub(super) fn is_feasible(
    initial: &ProjectionState,
    inputs: &MonthInputs,
    candidate_months: u32,
    horizon_months: u32,
) -> Result<bool> {
    let mut state = initial.clone();
    for _ in 0..candidate_months {
        state = advance_month(&state, inputs, MonthPhase::Accumulation)?;
    }
    if state.net_worth() < Decimal::ZERO {
        return Ok(false);
    }
    for _ in candidate_months..horizon_months {
        state = advance_month(&state, inputs, MonthPhase::Drawdown)?;
        if state.net_worth() < Decimal::ZERO {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Lazy month-by-month forecast, yielding at most the requested number of
/// accumulation steps. The iterator fuses after yielding an error.
pub struct ProjectionIter {
    state: ProjectionState,
    inputs: MonthInputs,
    months_remaining: u32,
    failed: bool,
}

impl ProjectionIter {
    pub(super) fn new(initial: ProjectionState, inputs: MonthInputs, months: u32) -> Self {
        Self {
            state: initial,
            inputs,
            months_remaining: months,
            failed: false,
        }
    }
}

impl Iterator for ProjectionIter {
    type Item = Result<ProjectionState>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.months_remaining == 0 {
            return None;
        }
        match advance_month(&self.state, &self.inputs, MonthPhase::Accumulation) {
            Ok(next) => {
                self.months_remaining -= 1;
                self.state = next;
                Some(Ok(self.state.clone()))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        (0, Some(self.months_remaining as usize))
    }
}
