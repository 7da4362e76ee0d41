//! Service running forward simulations - N-year forecasts, the retirement
//! date search, and the readiness snapshot.

use std::sync::{Arc, RwLock};

use chrono::{Datelike, NaiveDate};
use log::debug;
use rayon::prelude::*;
use rust_decimal::Decimal;

use super::forecast_model::{
    Assumptions, ForecastError, MonthInputs, MonthPhase, ProjectedBalance, ProjectionState,
    RetirementPlan, RetirementReadiness, ScheduledFlow,
};
use super::projection::{advance_month, is_feasible, monthly_rate, ProjectionIter};
use crate::constants::{DECIMAL_PRECISION, MAX_HORIZON_YEARS, MONTHS_PER_YEAR, RATIO_PRECISION};
use crate::errors::{Error, Result};
use crate::fx::FxServiceTrait;
use crate::ledger::{FlowKind, LedgerReaderTrait};
use crate::money::Money;
use crate::valuation::ValuationServiceTrait;

/// Trait defining the contract for forecasting operations.
pub trait ForecastServiceTrait: Send + Sync {
    /// Lazy month-by-month projection covering the next `years` years.
    fn project(
        &self,
        today: NaiveDate,
        years: u32,
        assumptions: &Assumptions,
    ) -> Result<ProjectionIter>;

    /// Earliest retirement month that stays funded through the horizon.
    fn retirement_date(&self, today: NaiveDate, assumptions: &Assumptions)
        -> Result<RetirementPlan>;

    /// Current standing against the safe-withdrawal target.
    fn readiness(&self, today: NaiveDate, assumptions: &Assumptions)
        -> Result<RetirementReadiness>;
}

/// Simulation driver over the current ledger snapshot.
///
/// Projections are derived fresh on every call and never cached; they
/// depend on caller-supplied assumptions, not only on ledger state.
pub struct ForecastService {
    ledger: Arc<dyn LedgerReaderTrait>,
    fx: Arc<dyn FxServiceTrait>,
    valuation: Arc<dyn ValuationServiceTrait>,
    base_currency: Arc<RwLock<String>>,
}

impl ForecastService {
    pub fn new(
        ledger: Arc<dyn LedgerReaderTrait>,
        fx: Arc<dyn FxServiceTrait>,
        valuation: Arc<dyn ValuationServiceTrait>,
        base_currency: Arc<RwLock<String>>,
    ) -> Self {
        Self {
            ledger,
            fx,
            valuation,
            base_currency,
        }
    }

    fn reference_currency(&self) -> String {
        self.base_currency.read().unwrap().clone()
    }

    /// Snapshot of today's finances as the month-zero simulation state.
    fn initial_state(&self, today: NaiveDate, assumptions: &Assumptions) -> Result<ProjectionState> {
        let base_currency = self.reference_currency();

        // Simulated months run first-of-month to first-of-month.
        let start = today
            .with_day(1)
            .ok_or_else(|| Error::Validation(format!("invalid projection start {today}")))?;

        // 1. Account balances in the reference currency.
        let mut balances = Vec::new();
        let mut accounts_total = Decimal::ZERO;
        for account in self.ledger.list_accounts()? {
            if account.opened_on > today {
                continue;
            }
            let converted = self
                .fx
                .convert(&account.balance_money(), &base_currency, today)?;
            accounts_total += converted.amount();
            balances.push(ProjectedBalance {
                account_id: account.id,
                name: account.name,
                kind: account.kind,
                balance: converted.amount(),
            });
        }

        // 2. The invested pool is everything net worth holds beyond account
        //    balances, consistent with the valuation service.
        let net_worth = self.valuation.net_worth(today)?;
        let invested_assets = net_worth.amount() - accounts_total;

        Ok(ProjectionState {
            date: start,
            balances,
            invested_assets,
            monthly_spending: assumptions.target_monthly_spending,
            currency: base_currency,
        })
    }

    /// Monthly rates and the recurring flow schedule, fixed for the whole
    /// simulation. Flow amounts convert at today's rate once.
    fn month_inputs(&self, today: NaiveDate, assumptions: &Assumptions) -> Result<MonthInputs> {
        let base_currency = self.reference_currency();

        let mut flows = Vec::new();
        for kind in [FlowKind::Income, FlowKind::Expense] {
            for record in self.ledger.recurring_flows(kind)? {
                let recurrence = match record.recurrence {
                    Some(recurrence) => recurrence,
                    None => continue,
                };
                let converted = self
                    .fx
                    .convert(&record.amount_money(), &base_currency, today)?;
                flows.push(ScheduledFlow {
                    kind,
                    account_id: record.account_id,
                    anchor: record.date,
                    amount: converted.amount(),
                    recurrence,
                });
            }
        }

        Ok(MonthInputs {
            monthly_return_rate: monthly_rate(assumptions.annual_return_rate),
            monthly_inflation_rate: monthly_rate(assumptions.annual_inflation_rate),
            flows,
        })
    }
}

impl ForecastServiceTrait for ForecastService {
    fn project(
        &self,
        today: NaiveDate,
        years: u32,
        assumptions: &Assumptions,
    ) -> Result<ProjectionIter> {
        debug!("Projection requested for {} years from {}", years, today);
        assumptions.validate()?;
        if years == 0 || years > MAX_HORIZON_YEARS {
            return Err(Error::Validation(format!(
                "projection length must be between 1 and {MAX_HORIZON_YEARS} years, got {years}"
            )));
        }

        let initial = self.initial_state(today, assumptions)?;
        let inputs = self.month_inputs(today, assumptions)?;
        Ok(ProjectionIter::new(initial, inputs, years * MONTHS_PER_YEAR))
    }

    fn retirement_date(
        &self,
        today: NaiveDate,
        assumptions: &Assumptions,
    ) -> Result<RetirementPlan> {
        debug!("Retirement search requested from {}", today);
        assumptions.validate()?;

        let initial = self.initial_state(today, assumptions)?;
        let inputs = self.month_inputs(today, assumptions)?;
        let horizon_months = assumptions.horizon_years * MONTHS_PER_YEAR;

        // Candidates retire strictly before the horizon, leaving at least
        // one drawdown month. Each is an independent full simulation,
        // scanned in parallel.
        let feasible = (0..horizon_months)
            .into_par_iter()
            .map(|candidate| is_feasible(&initial, &inputs, candidate, horizon_months))
            .collect::<Result<Vec<bool>>>()?;

        // The answer is the month after the last infeasible candidate, so
        // every later start stays feasible too.
        let months_until = match feasible.iter().rposition(|&ok| !ok) {
            None => 0,
            Some(last) if last == feasible.len() - 1 => {
                return Err(ForecastError::NoFeasibleDate {
                    horizon_years: assumptions.horizon_years,
                }
                .into())
            }
            Some(last) => last as u32 + 1,
        };

        let mut state = initial;
        for _ in 0..months_until {
            state = advance_month(&state, &inputs, MonthPhase::Accumulation)?;
        }

        Ok(RetirementPlan {
            retirement_date: state.date,
            months_until,
            net_worth_at_retirement: Money::new(
                state.net_worth().round_dp(DECIMAL_PRECISION),
                &state.currency,
            ),
        })
    }

    fn readiness(&self, today: NaiveDate, assumptions: &Assumptions) -> Result<RetirementReadiness> {
        debug!("Retirement readiness requested as of {}", today);
        assumptions.validate()?;

        let current = self.valuation.net_worth(today)?;

        // Target implied by the safe withdrawal rate: annual spending
        // scaled by 100 / SWR.
        let annual_spending = assumptions.target_monthly_spending * Decimal::from(MONTHS_PER_YEAR);
        let target_amount = (annual_spending * Decimal::ONE_HUNDRED
            / assumptions.safe_withdrawal_rate)
            .round_dp(DECIMAL_PRECISION);
        let target = Money::new(target_amount, current.currency());

        // Zero spending needs no nest egg at all.
        let fi_ratio = if target_amount.is_zero() {
            Decimal::ONE
        } else {
            (current.amount() / target_amount).round_dp(RATIO_PRECISION)
        };

        Ok(RetirementReadiness {
            current_net_worth: current,
            target_net_worth: target,
            fi_ratio,
        })
    }
}
