//! Forecast domain models - assumptions, simulated states, and the
//! results of the retirement search.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MAX_HORIZON_YEARS;
use crate::ledger::{AccountKind, FlowKind, Recurrence};
use crate::money::Money;

/// Errors raised by the projection engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForecastError {
    #[error("No feasible retirement date within {horizon_years} years")]
    NoFeasibleDate { horizon_years: u32 },

    #[error("Invalid assumptions: {0}")]
    InvalidAssumptions(String),
}

/// User-supplied rates and targets driving a simulation.
///
/// Rates are annual fractions (`0.05` for 5%); the engine derives the
/// monthly-equivalent rates itself. Amounts are in the reference currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assumptions {
    pub annual_return_rate: Decimal,
    pub annual_inflation_rate: Decimal,
    pub target_monthly_spending: Decimal,
    /// Percent of the nest egg withdrawn per year, `4` for the classic rule.
    pub safe_withdrawal_rate: Decimal,
    pub horizon_years: u32,
}

impl Assumptions {
    pub fn validate(&self) -> std::result::Result<(), ForecastError> {
        if self.annual_return_rate <= Decimal::NEGATIVE_ONE {
            return Err(ForecastError::InvalidAssumptions(
                "annual return rate must be greater than -100%".to_string(),
            ));
        }
        if self.annual_inflation_rate <= Decimal::NEGATIVE_ONE {
            return Err(ForecastError::InvalidAssumptions(
                "annual inflation rate must be greater than -100%".to_string(),
            ));
        }
        if self.target_monthly_spending.is_sign_negative() {
            return Err(ForecastError::InvalidAssumptions(
                "target monthly spending cannot be negative".to_string(),
            ));
        }
        if self.safe_withdrawal_rate <= Decimal::ZERO {
            return Err(ForecastError::InvalidAssumptions(
                "safe withdrawal rate must be positive".to_string(),
            ));
        }
        if self.horizon_years == 0 || self.horizon_years > MAX_HORIZON_YEARS {
            return Err(ForecastError::InvalidAssumptions(format!(
                "horizon must be between 1 and {MAX_HORIZON_YEARS} years, got {}",
                self.horizon_years
            )));
        }
        Ok(())
    }
}

/// One account balance inside a simulated state, in the reference currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedBalance {
    pub account_id: String,
    pub name: String,
    pub kind: AccountKind,
    pub balance: Decimal,
}

/// A simulated financial snapshot, advanced month by month.
///
/// `invested_assets` is the valued holdings net of liabilities, pooled into
/// one returning balance; per-account detail only exists for accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionState {
    pub date: NaiveDate,
    pub balances: Vec<ProjectedBalance>,
    pub invested_assets: Decimal,
    pub monthly_spending: Decimal,
    pub currency: String,
}

impl ProjectionState {
    pub fn cash_total(&self) -> Decimal {
        self.balances
            .iter()
            .filter(|b| b.kind == AccountKind::Cash)
            .map(|b| b.balance)
            .sum()
    }

    /// Investment account balances plus the pooled asset value.
    pub fn invested_total(&self) -> Decimal {
        let accounts: Decimal = self
            .balances
            .iter()
            .filter(|b| b.kind == AccountKind::Investment)
            .map(|b| b.balance)
            .sum();
        accounts + self.invested_assets
    }

    pub fn net_worth(&self) -> Decimal {
        self.cash_total() + self.invested_total()
    }
}

/// Whether a simulated month accrues contributions or draws spending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthPhase {
    Accumulation,
    Drawdown,
}

/// A recurring flow fixed in the reference currency for the simulation.
///
/// Amounts are converted once when the schedule is built; the simulation
/// never consults the rate book.
#[derive(Debug, Clone)]
pub struct ScheduledFlow {
    pub kind: FlowKind,
    pub account_id: Option<String>,
    pub anchor: NaiveDate,
    pub amount: Decimal,
    pub recurrence: Recurrence,
}

/// Per-month inputs shared by every step of one simulation.
#[derive(Debug, Clone)]
pub struct MonthInputs {
    pub monthly_return_rate: Decimal,
    pub monthly_inflation_rate: Decimal,
    pub flows: Vec<ScheduledFlow>,
}

/// Outcome of the retirement search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementPlan {
    pub retirement_date: NaiveDate,
    pub months_until: u32,
    pub net_worth_at_retirement: Money,
}

/// Current standing against the safe-withdrawal target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementReadiness {
    pub current_net_worth: Money,
    pub target_net_worth: Money,
    pub fi_ratio: Decimal,
}
