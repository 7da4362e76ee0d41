//! Ledger domain models - the dated records the engines read.
//!
//! Records are owned and mutated by the external CRUD layer; the core only
//! reads them. Constructors assign uuid ids; `validate()` helpers exist for
//! that layer but no writer in this crate enforces them.

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Error, Result};
use crate::fx::ExchangeRate;
use crate::money::Money;

/// The record kinds tracked by the generation vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Account,
    Income,
    Expense,
    Debt,
    Asset,
    AssetValue,
    AssetClass,
    Liability,
    ExchangeRate,
}

impl EntityKind {
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Account,
        EntityKind::Income,
        EntityKind::Expense,
        EntityKind::Debt,
        EntityKind::Asset,
        EntityKind::AssetValue,
        EntityKind::AssetClass,
        EntityKind::Liability,
        EntityKind::ExchangeRate,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Selects one of the two flow record stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlowKind {
    Income,
    Expense,
}

impl FlowKind {
    pub fn entity_kind(self) -> EntityKind {
        match self {
            FlowKind::Income => EntityKind::Income,
            FlowKind::Expense => EntityKind::Expense,
        }
    }
}

/// Half-open date window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Builds a range, rejecting `end <= start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end <= start {
            return Err(Error::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// Recurrence interval attached to a flow record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Recurrence {
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    /// Expands the occurrences of a record anchored at `anchor` that fall
    /// inside `range`, one per interval boundary. Monthly and yearly steps
    /// clamp to the end of shorter months, always measured from the anchor
    /// so the day of month never drifts.
    pub fn occurrences_between(&self, anchor: NaiveDate, range: &DateRange) -> Vec<NaiveDate> {
        let mut occurrences = Vec::new();
        let mut step = 0u32;
        while let Some(date) = self.nth_occurrence(anchor, step) {
            if date >= range.end() {
                break;
            }
            if date >= range.start() {
                occurrences.push(date);
            }
            step += 1;
        }
        occurrences
    }

    fn nth_occurrence(&self, anchor: NaiveDate, n: u32) -> Option<NaiveDate> {
        match self {
            Recurrence::Weekly => anchor.checked_add_days(Days::new(7 * u64::from(n))),
            Recurrence::Monthly => anchor.checked_add_months(Months::new(n)),
            Recurrence::Yearly => anchor.checked_add_months(Months::new(n.checked_mul(12)?)),
        }
    }
}

/// Whether an account balance earns the assumed market return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountKind {
    Cash,
    Investment,
}

/// A balance-carrying account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub kind: AccountKind,
    pub currency: String,
    pub balance: Decimal,
    pub opened_on: NaiveDate,
}

impl Account {
    pub fn new(
        name: impl Into<String>,
        kind: AccountKind,
        currency: impl Into<String>,
        balance: Decimal,
        opened_on: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            kind,
            currency: currency.into(),
            balance,
            opened_on,
        }
    }

    pub fn balance_money(&self) -> Money {
        Money::new(self.balance, &self.currency)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("account name cannot be empty".to_string()));
        }
        validate_code(&self.currency)
    }
}

/// An income or expense record, optionally recurring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowRecord {
    pub id: String,
    pub account_id: Option<String>,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub recurrence: Option<Recurrence>,
}

impl FlowRecord {
    pub fn new(
        description: impl Into<String>,
        amount: Decimal,
        currency: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id: None,
            date,
            description: description.into(),
            amount,
            currency: currency.into(),
            recurrence: None,
        }
    }

    /// A record repeating from `anchor` at the given interval.
    pub fn recurring(
        description: impl Into<String>,
        amount: Decimal,
        currency: impl Into<String>,
        anchor: NaiveDate,
        recurrence: Recurrence,
    ) -> Self {
        let mut record = Self::new(description, amount, currency, anchor);
        record.recurrence = Some(recurrence);
        record
    }

    pub fn amount_money(&self) -> Money {
        Money::new(self.amount, &self.currency)
    }

    pub fn validate(&self) -> Result<()> {
        if self.amount.is_sign_negative() {
            return Err(Error::Validation(
                "flow amounts are unsigned; use the record kind for direction".to_string(),
            ));
        }
        validate_code(&self.currency)
    }
}

/// Direction of a tracked debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DebtDirection {
    Borrowed,
    Lent,
}

/// Money owed to or by a counterparty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub id: String,
    pub direction: DebtDirection,
    pub counterparty: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub currency: String,
    pub paid: bool,
}

impl Debt {
    pub fn new(
        direction: DebtDirection,
        counterparty: impl Into<String>,
        amount: Decimal,
        currency: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            direction,
            counterparty: counterparty.into(),
            date,
            amount,
            currency: currency.into(),
            paid: false,
        }
    }

    pub fn amount_money(&self) -> Money {
        Money::new(self.amount, &self.currency)
    }
}

/// Share of an asset attributed to one asset class, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassWeight {
    pub class_id: String,
    pub weight: Decimal,
}

impl ClassWeight {
    pub fn new(class_id: impl Into<String>, weight: Decimal) -> Self {
        Self {
            class_id: class_id.into(),
            weight,
        }
    }
}

/// A valued holding; its worth over time comes from [`AssetValue`] records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub currency: String,
    pub acquired_on: NaiveDate,
    pub classes: Vec<ClassWeight>,
}

impl Asset {
    pub fn new(
        name: impl Into<String>,
        currency: impl Into<String>,
        acquired_on: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            currency: currency.into(),
            acquired_on,
            classes: Vec::new(),
        }
    }

    pub fn with_classes(mut self, classes: Vec<ClassWeight>) -> Self {
        self.classes = classes;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_code(&self.currency)?;
        if self.classes.is_empty() {
            return Ok(());
        }
        let total: Decimal = self.classes.iter().map(|c| c.weight).sum();
        if total != Decimal::ONE_HUNDRED {
            return Err(Error::Validation(format!(
                "class weights for asset '{}' sum to {total}, expected 100",
                self.name
            )));
        }
        Ok(())
    }
}

/// A dated value observation for an asset or liability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetValue {
    pub id: String,
    pub holder_id: String,
    pub date: NaiveDate,
    pub value: Decimal,
}

impl AssetValue {
    pub fn new(holder_id: impl Into<String>, date: NaiveDate, value: Decimal) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            holder_id: holder_id.into(),
            date,
            value,
        }
    }
}

/// A named allocation bucket assets can be split across.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetClass {
    pub id: String,
    pub name: String,
}

impl AssetClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }
}

/// A standing obligation, valued through [`AssetValue`] records like assets
/// and subtracted from net worth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Liability {
    pub id: String,
    pub name: String,
    pub currency: String,
    pub opened_on: NaiveDate,
}

impl Liability {
    pub fn new(
        name: impl Into<String>,
        currency: impl Into<String>,
        opened_on: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            currency: currency.into(),
            opened_on,
        }
    }
}

/// A kind-erased ledger record, as returned by
/// [`super::LedgerReaderTrait::list_records`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "camelCase")]
pub enum Record {
    Account(Account),
    Income(FlowRecord),
    Expense(FlowRecord),
    Debt(Debt),
    Asset(Asset),
    AssetValue(AssetValue),
    AssetClass(AssetClass),
    Liability(Liability),
    ExchangeRate(ExchangeRate),
}

impl Record {
    /// Date used for range filtering and ordering; class records are undated.
    pub fn record_date(&self) -> Option<NaiveDate> {
        match self {
            Record::Account(a) => Some(a.opened_on),
            Record::Income(f) | Record::Expense(f) => Some(f.date),
            Record::Debt(d) => Some(d.date),
            Record::Asset(a) => Some(a.acquired_on),
            Record::AssetValue(v) => Some(v.date),
            Record::AssetClass(_) => None,
            Record::Liability(l) => Some(l.opened_on),
            Record::ExchangeRate(r) => Some(r.date),
        }
    }

    pub fn record_id(&self) -> &str {
        match self {
            Record::Account(a) => &a.id,
            Record::Income(f) | Record::Expense(f) => &f.id,
            Record::Debt(d) => &d.id,
            Record::Asset(a) => &a.id,
            Record::AssetValue(v) => &v.id,
            Record::AssetClass(c) => &c.id,
            Record::Liability(l) => &l.id,
            Record::ExchangeRate(r) => &r.id,
        }
    }
}

fn validate_code(currency: &str) -> Result<()> {
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "'{currency}' is not a 3-letter uppercase currency code"
        )))
    }
}
