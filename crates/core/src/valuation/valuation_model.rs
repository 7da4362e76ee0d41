//! Valuation domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use chrono::NaiveDate;

use crate::ledger::EntityKind;

/// Cache key for a net worth aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetWorthKey {
    pub as_of: NaiveDate,
}

impl NetWorthKey {
    pub const DEPENDS_ON: &'static [EntityKind] = &[
        EntityKind::Account,
        EntityKind::Asset,
        EntityKind::AssetValue,
        EntityKind::Liability,
        EntityKind::ExchangeRate,
    ];
}

/// Cache key for an asset allocation aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllocationKey {
    pub as_of: NaiveDate,
}

impl AllocationKey {
    pub const DEPENDS_ON: &'static [EntityKind] = &[
        EntityKind::Asset,
        EntityKind::AssetValue,
        EntityKind::AssetClass,
        EntityKind::ExchangeRate,
    ];
}

/// One asset class slice of the allocation breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSlice {
    /// Class id, or the unclassified bucket id
    pub class_id: String,
    /// Display name
    pub class_name: String,
    /// Value in the reference currency
    pub value: Decimal,
    /// Share of total asset value, rounded to 2 places
    pub percentage: Decimal,
}

/// Asset allocation as of a date.
///
/// A total asset value of zero is a distinct outcome rather than a division
/// by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "slices", rename_all = "camelCase")]
pub enum AssetAllocation {
    NoAssets,
    Allocated(Vec<AllocationSlice>),
}

impl AssetAllocation {
    pub fn slices(&self) -> &[AllocationSlice] {
        match self {
            AssetAllocation::NoAssets => &[],
            AssetAllocation::Allocated(slices) => slices,
        }
    }
}
