//! Service computing net worth and asset allocation in the reference
//! currency.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use super::valuation_calculator::{class_display_name, split_by_class, value_on_or_before};
use super::valuation_model::{AllocationKey, AllocationSlice, AssetAllocation, NetWorthKey};
use crate::cache::{ComputeCache, GenerationClock};
use crate::constants::PERCENT_PRECISION;
use crate::errors::Result;
use crate::fx::FxServiceTrait;
use crate::ledger::LedgerReaderTrait;
use crate::money::Money;

/// Trait defining the contract for valuation operations.
pub trait ValuationServiceTrait: Send + Sync {
    /// Net worth as of `as_of`: account balances plus latest asset values,
    /// minus latest liability values, each converted to the reference
    /// currency at `as_of`.
    fn net_worth(&self, as_of: NaiveDate) -> Result<Money>;

    /// Asset value split by class as of `as_of`.
    fn asset_allocation(&self, as_of: NaiveDate) -> Result<AssetAllocation>;
}

/// Cached valuation aggregations over the ledger.
pub struct ValuationService {
    ledger: Arc<dyn LedgerReaderTrait>,
    fx: Arc<dyn FxServiceTrait>,
    base_currency: Arc<RwLock<String>>,
    net_worths: ComputeCache<NetWorthKey, Money>,
    allocations: ComputeCache<AllocationKey, AssetAllocation>,
}

impl ValuationService {
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
            net_worths: ComputeCache::new(Arc::clone(&clock), NetWorthKey::DEPENDS_ON),
            allocations: ComputeCache::new(clock, AllocationKey::DEPENDS_ON),
        }
    }

    fn reference_currency(&self) -> String {
        self.base_currency.read().unwrap().clone()
    }

    fn compute_net_worth(&self, as_of: NaiveDate) -> Result<Money> {
        let base_currency = self.reference_currency();

        let accounts = self.ledger.list_accounts()?;
        let assets = self.ledger.list_assets()?;
        let liabilities = self.ledger.list_liabilities()?;
        let values = self.ledger.list_asset_values()?;

        let mut total = Money::zero(&base_currency);

        // 1. Account balances, excluding accounts opened after the date.
        for account in &accounts {
            if account.opened_on > as_of {
                continue;
            }
            let converted = self
                .fx
                .convert(&account.balance_money(), &base_currency, as_of)?;
            total = total.try_add(&converted)?;
        }

        // 2. Latest recorded asset values on or before the date. An asset
        //    with no value record yet contributes nothing.
        for asset in &assets {
            if asset.acquired_on > as_of {
                continue;
            }
            if let Some(value) = value_on_or_before(&values, &asset.id, as_of) {
                let converted =
                    self.fx
                        .convert(&Money::new(value, &asset.currency), &base_currency, as_of)?;
                total = total.try_add(&converted)?;
            }
        }

        // 3. Liabilities are valued the same way and subtracted.
        for liability in &liabilities {
            if liability.opened_on > as_of {
                continue;
            }
            if let Some(value) = value_on_or_before(&values, &liability.id, as_of) {
                let converted = self.fx.convert(
                    &Money::new(value, &liability.currency),
                    &base_currency,
                    as_of,
                )?;
                total = total.try_sub(&converted)?;
            }
        }

        Ok(total)
    }

    fn compute_allocation(&self, as_of: NaiveDate) -> Result<AssetAllocation> {
        let base_currency = self.reference_currency();

        let assets = self.ledger.list_assets()?;
        let classes = self.ledger.list_asset_classes()?;
        let values = self.ledger.list_asset_values()?;

        // 1. Value each asset in the reference currency and split it across
        //    its class weights.
        let mut totals: HashMap<String, Decimal> = HashMap::new();
        for asset in &assets {
            if asset.acquired_on > as_of {
                continue;
            }
            let value = match value_on_or_before(&values, &asset.id, as_of) {
                Some(value) => value,
                None => continue,
            };
            let converted =
                self.fx
                    .convert(&Money::new(value, &asset.currency), &base_currency, as_of)?;
            split_by_class(asset, converted.amount(), &mut totals);
        }

        // 2. Zero total value is a distinct outcome.
        let total: Decimal = totals.values().copied().sum();
        if total <= Decimal::ZERO {
            return Ok(AssetAllocation::NoAssets);
        }

        // 3. Build the slices with percentages, largest first.
        let mut slices: Vec<AllocationSlice> = totals
            .into_iter()
            .filter(|(_, value)| *value > Decimal::ZERO)
            .map(|(class_id, value)| {
                let percentage = (value / total * Decimal::ONE_HUNDRED).round_dp(PERCENT_PRECISION);
                AllocationSlice {
                    class_name: class_display_name(&class_id, &classes),
                    class_id,
                    value,
                    percentage,
                }
            })
            .collect();
        slices.sort_by(|a, b| b.value.cmp(&a.value));

        Ok(AssetAllocation::Allocated(slices))
    }
}

impl ValuationServiceTrait for ValuationService {
    fn net_worth(&self, as_of: NaiveDate) -> Result<Money> {
        debug!("Net worth requested as of {}", as_of);
        self.net_worths
            .get_or_compute(NetWorthKey { as_of }, || self.compute_net_worth(as_of))
    }

    fn asset_allocation(&self, as_of: NaiveDate) -> Result<AssetAllocation> {
        debug!("Asset allocation requested as of {}", as_of);
        self.allocations
            .get_or_compute(AllocationKey { as_of }, || self.compute_allocation(as_of))
    }
}
