//! Read-only ledger access contract the engines consume.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::ledger_model::{
    Account, Asset, AssetClass, AssetValue, DateRange, Debt, EntityKind, FlowKind, FlowRecord,
    Liability, Record,
};
use crate::errors::Result;
use crate::fx::ExchangeRate;

/// Read-only view over the externally-owned record stores.
///
/// Implementations must be pure reads with no side effects observable to the
/// core, and must hand out either the full pre-mutation or full post-mutation
/// state for a kind, never a partially applied write.
pub trait LedgerReaderTrait: Send + Sync {
    fn list_accounts(&self) -> Result<Vec<Account>>;

    /// Records of one kind ordered by date then id. Undated kinds ignore the
    /// range.
    fn list_records(&self, kind: EntityKind, range: &DateRange) -> Result<Vec<Record>>;

    /// One-off flow records of one kind dated inside the half-open range,
    /// ordered by date then id. Recurring records are excluded; they come
    /// from [`recurring_flows`](Self::recurring_flows) and are expanded by
    /// the caller.
    fn flows_in(&self, kind: FlowKind, range: &DateRange) -> Result<Vec<FlowRecord>>;

    /// Flow records of one kind carrying recurrence metadata, regardless of
    /// anchor date.
    fn recurring_flows(&self, kind: FlowKind) -> Result<Vec<FlowRecord>>;

    fn list_debts(&self) -> Result<Vec<Debt>>;

    fn list_assets(&self) -> Result<Vec<Asset>>;

    fn list_asset_classes(&self) -> Result<Vec<AssetClass>>;

    fn list_asset_values(&self) -> Result<Vec<AssetValue>>;

    fn list_liabilities(&self) -> Result<Vec<Liability>>;

    /// Rate recorded for the pair on exactly `date`, if any. Fallback to
    /// earlier dates is the converter's concern, not the store's.
    fn exchange_rate(&self, from: &str, to: &str, date: NaiveDate) -> Result<Option<Decimal>>;

    /// Full rate history, unordered.
    fn exchange_rates(&self) -> Result<Vec<ExchangeRate>>;
}
