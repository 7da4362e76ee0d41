//! In-memory reference implementation of the ledger stores.
//!
//! One `RwLock` per entity kind gives writers exclusive access against
//! readers of that kind. Writers bump the generation clock while still
//! holding the write lock, so a committed record is never visible before
//! the bump that announces it.

use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::ledger_model::{
    Account, Asset, AssetClass, AssetValue, DateRange, Debt, EntityKind, FlowKind, FlowRecord,
    Liability, Record,
};
use super::ledger_traits::LedgerReaderTrait;
use crate::cache::GenerationClock;
use crate::errors::Result;
use crate::fx::ExchangeRate;

/// Thread-safe in-memory record stores with minimal typed writers.
///
/// The writers stand in for the excluded CRUD layer: they commit a record and
/// notify the invalidation sweeper, nothing more. No entity validation
/// happens here.
pub struct MemoryLedger {
    clock: Arc<GenerationClock>,
    accounts: RwLock<Vec<Account>>,
    incomes: RwLock<Vec<FlowRecord>>,
    expenses: RwLock<Vec<FlowRecord>>,
    debts: RwLock<Vec<Debt>>,
    assets: RwLock<Vec<Asset>>,
    asset_values: RwLock<Vec<AssetValue>>,
    asset_classes: RwLock<Vec<AssetClass>>,
    liabilities: RwLock<Vec<Liability>>,
    exchange_rates: RwLock<Vec<ExchangeRate>>,
}

impl MemoryLedger {
    pub fn new(clock: Arc<GenerationClock>) -> Self {
        Self {
            clock,
            accounts: RwLock::new(Vec::new()),
            incomes: RwLock::new(Vec::new()),
            expenses: RwLock::new(Vec::new()),
            debts: RwLock::new(Vec::new()),
            assets: RwLock::new(Vec::new()),
            asset_values: RwLock::new(Vec::new()),
            asset_classes: RwLock::new(Vec::new()),
            liabilities: RwLock::new(Vec::new()),
            exchange_rates: RwLock::new(Vec::new()),
        }
    }

    fn flow_store(&self, kind: FlowKind) -> &RwLock<Vec<FlowRecord>> {
        match kind {
            FlowKind::Income => &self.incomes,
            FlowKind::Expense => &self.expenses,
        }
    }

    // ==================== Writers ====================

    /// Inserts or replaces an account by id.
    pub fn upsert_account(&self, account: Account) {
        let mut accounts = self.accounts.write().unwrap();
        match accounts.iter_mut().find(|a| a.id == account.id) {
            Some(existing) => *existing = account,
            None => accounts.push(account),
        }
        self.clock.bump(EntityKind::Account);
    }

    pub fn add_flow(&self, kind: FlowKind, flow: FlowRecord) {
        let mut flows = self.flow_store(kind).write().unwrap();
        flows.push(flow);
        self.clock.bump(kind.entity_kind());
    }

    /// Removes a flow record by id, reporting whether one existed.
    pub fn remove_flow(&self, kind: FlowKind, id: &str) -> bool {
        let mut flows = self.flow_store(kind).write().unwrap();
        let before = flows.len();
        flows.retain(|f| f.id != id);
        let removed = flows.len() != before;
        if removed {
            self.clock.bump(kind.entity_kind());
        }
        removed
    }

    pub fn add_debt(&self, debt: Debt) {
        let mut debts = self.debts.write().unwrap();
        debts.push(debt);
        self.clock.bump(EntityKind::Debt);
    }

    pub fn add_asset(&self, asset: Asset) {
        let mut assets = self.assets.write().unwrap();
        assets.push(asset);
        self.clock.bump(EntityKind::Asset);
    }

    pub fn add_asset_value(&self, value: AssetValue) {
        let mut values = self.asset_values.write().unwrap();
        values.push(value);
        self.clock.bump(EntityKind::AssetValue);
    }

    pub fn add_asset_class(&self, class: AssetClass) {
        let mut classes = self.asset_classes.write().unwrap();
        classes.push(class);
        self.clock.bump(EntityKind::AssetClass);
    }

    pub fn add_liability(&self, liability: Liability) {
        let mut liabilities = self.liabilities.write().unwrap();
        liabilities.push(liability);
        self.clock.bump(EntityKind::Liability);
    }

    pub fn add_exchange_rate(&self, rate: ExchangeRate) {
        let mut rates = self.exchange_rates.write().unwrap();
        rates.push(rate);
        self.clock.bump(EntityKind::ExchangeRate);
    }
}

impl LedgerReaderTrait for MemoryLedger {
    fn list_accounts(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.read().unwrap().clone())
    }

    fn list_records(&self, kind: EntityKind, range: &DateRange) -> Result<Vec<Record>> {
        let mut records: Vec<Record> = match kind {
            EntityKind::Account => self
                .accounts
                .read()
                .unwrap()
                .iter()
                .cloned()
                .map(Record::Account)
                .collect(),
            EntityKind::Income => self
                .incomes
                .read()
                .unwrap()
                .iter()
                .cloned()
                .map(Record::Income)
                .collect(),
            EntityKind::Expense => self
                .expenses
                .read()
                .unwrap()
                .iter()
                .cloned()
                .map(Record::Expense)
                .collect(),
            EntityKind::Debt => self
                .debts
                .read()
                .unwrap()
                .iter()
                .cloned()
                .map(Record::Debt)
                .collect(),
            EntityKind::Asset => self
                .assets
                .read()
                .unwrap()
                .iter()
                .cloned()
                .map(Record::Asset)
                .collect(),
            EntityKind::AssetValue => self
                .asset_values
                .read()
                .unwrap()
                .iter()
                .cloned()
                .map(Record::AssetValue)
                .collect(),
            EntityKind::AssetClass => self
                .asset_classes
                .read()
                .unwrap()
                .iter()
                .cloned()
                .map(Record::AssetClass)
                .collect(),
            EntityKind::Liability => self
                .liabilities
                .read()
                .unwrap()
                .iter()
                .cloned()
                .map(Record::Liability)
                .collect(),
            EntityKind::ExchangeRate => self
                .exchange_rates
                .read()
                .unwrap()
                .iter()
                .cloned()
                .map(Record::ExchangeRate)
                .collect(),
        };
        records.retain(|r| r.record_date().map_or(true, |d| range.contains(d)));
        records.sort_by(|a, b| {
            (a.record_date(), a.record_id()).cmp(&(b.record_date(), b.record_id()))
        });
        Ok(records)
    }

    fn flows_in(&self, kind: FlowKind, range: &DateRange) -> Result<Vec<FlowRecord>> {
        let flows = self.flow_store(kind).read().unwrap();
        let mut selected: Vec<FlowRecord> = flows
            .iter()
            .filter(|f| f.recurrence.is_none() && range.contains(f.date))
            .cloned()
            .collect();
        selected.sort_by(|a, b| (a.date, &a.id).cmp(&(b.date, &b.id)));
        Ok(selected)
    }

    fn recurring_flows(&self, kind: FlowKind) -> Result<Vec<FlowRecord>> {
        let flows = self.flow_store(kind).read().unwrap();
        Ok(flows.iter().filter(|f| f.recurrence.is_some()).cloned().collect())
    }

    fn list_debts(&self) -> Result<Vec<Debt>> {
        Ok(self.debts.read().unwrap().clone())
    }

    fn list_assets(&self) -> Result<Vec<Asset>> {
        Ok(self.assets.read().unwrap().clone())
    }

    fn list_asset_classes(&self) -> Result<Vec<AssetClass>> {
        Ok(self.asset_classes.read().unwrap().clone())
    }

    fn list_asset_values(&self) -> Result<Vec<AssetValue>> {
        Ok(self.asset_values.read().unwrap().clone())
    }

    fn list_liabilities(&self) -> Result<Vec<Liability>> {
        Ok(self.liabilities.read().unwrap().clone())
    }

    fn exchange_rate(&self, from: &str, to: &str, date: NaiveDate) -> Result<Option<Decimal>> {
        let rates = self.exchange_rates.read().unwrap();
        Ok(rates
            .iter()
            .filter(|r| r.from_currency == from && r.to_currency == to && r.date == date)
            .last()
            .map(|r| r.rate))
    }

    fn exchange_rates(&self) -> Result<Vec<ExchangeRate>> {
        Ok(self.exchange_rates.read().unwrap().clone())
    }
}
