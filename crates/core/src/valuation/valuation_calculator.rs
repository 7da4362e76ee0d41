//! Pure helpers shared by the valuation service.

use std::collections::HashMap;

use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;

use crate::constants::UNCLASSIFIED_CLASS_ID;
use crate::ledger::{Asset, AssetClass, AssetValue};

/// Latest recorded value for `holder_id` on or before `as_of`, if any.
/// Among records on the same date the later one wins.
pub(super) fn value_on_or_before(
    values: &[AssetValue],
    holder_id: &str,
    as_of: NaiveDate,
) -> Option<Decimal> {
    values
        .iter()
        .filter(|v| v.holder_id == holder_id && v.date <= as_of)
        .max_by_key(|v| v.date)
        .map(|v| v.value)
}

/// Splits `value` across the asset's class weights into `totals`.
///
/// An asset without weights lands in the unclassified bucket. Weights are
/// split proportionally over their actual sum, so the bucket totals always
/// add up to the asset values regardless of malformed weights (which are
/// logged, not rejected, at read time).
pub(super) fn split_by_class(asset: &Asset, value: Decimal, totals: &mut HashMap<String, Decimal>) {
    let weight_total: Decimal = asset.classes.iter().map(|w| w.weight).sum();

    if weight_total <= Decimal::ZERO {
        *totals
            .entry(UNCLASSIFIED_CLASS_ID.to_string())
            .or_insert(Decimal::ZERO) += value;
        return;
    }

    if weight_total != Decimal::ONE_HUNDRED {
        warn!(
            "Asset {} class weights sum to {}, splitting proportionally",
            asset.id, weight_total
        );
    }

    for class_weight in &asset.classes {
        let weighted_value = value * class_weight.weight / weight_total;
        *totals
            .entry(class_weight.class_id.clone())
            .or_insert(Decimal::ZERO) += weighted_value;
    }
}

/// Display name for a class id, falling back to the id itself.
pub(super) fn class_display_name(class_id: &str, classes: &[AssetClass]) -> String {
    if class_id == UNCLASSIFIED_CLASS_ID {
        return "Unclassified".to_string();
    }
    classes
        .iter()
        .find(|c| c.id == class_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| class_id.to_string())
}
