//! Property-based tests for the numeric engines.
//!
//! These tests verify that universal properties hold across all valid
//! inputs, using the `proptest` crate for random test case generation.

use proptest::prelude::*;
use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use fortuna_core::cache::GenerationClock;
use fortuna_core::forecast::monthly_rate;
use fortuna_core::fx::FxService;
use fortuna_core::ledger::{Asset, AssetValue, ClassWeight, LedgerReaderTrait, MemoryLedger};
use fortuna_core::money::{Money, MoneyError};
use fortuna_core::valuation::{ValuationService, ValuationServiceTrait};

// =============================================================================
// Generators
// =============================================================================

/// Generates an annual rate between -95% and +300%, in 0.1% steps.
fn arb_annual_rate() -> impl Strategy<Value = Decimal> {
    (-950i64..=3000).prop_map(|millis| Decimal::new(millis, 3))
}

/// Generates a positive whole-unit principal.
fn arb_principal() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000).prop_map(Decimal::from)
}

/// Generates a signed amount with cent precision.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..=100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Generates two distinct currency codes.
fn arb_currency_pair() -> impl Strategy<Value = (String, String)> {
    ("[A-Z]{3}", "[A-Z]{3}").prop_filter("codes must differ", |(left, right)| left != right)
}

/// Generates between one and eight positive asset values.
fn arb_asset_values() -> impl Strategy<Value = Vec<i64>> {
    proptest::collection::vec(1i64..=1_000_000, 1..=8)
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Feature: projection, Property 1: Monthly compounding reproduces the annual rate**
    ///
    /// Applying the monthly-equivalent rate twelve times to a principal must
    /// land on `principal * (1 + annual_rate)` within rounding tolerance.
    #[test]
    fn prop_monthly_rate_compounds_to_annual(
        principal in arb_principal(),
        annual_rate in arb_annual_rate(),
    ) {
        let monthly = monthly_rate(annual_rate);

        let mut compounded = principal;
        for _ in 0..12 {
            compounded *= Decimal::ONE + monthly;
        }

        let expected = principal * (Decimal::ONE + annual_rate);
        let error = (compounded - expected).abs();
        prop_assert!(
            error < dec!(0.01),
            "12 monthly steps gave {}, expected {} (annual rate {})",
            compounded,
            expected,
            annual_rate
        );
    }

    /// **Feature: money, Property 2: Mixed-currency addition always fails**
    ///
    /// `try_add` between two values of differing currencies must fail with
    /// `CurrencyMismatch` naming both codes, for every currency pair.
    #[test]
    fn prop_mixed_currency_addition_always_fails(
        (left_code, right_code) in arb_currency_pair(),
        left_amount in arb_amount(),
        right_amount in arb_amount(),
    ) {
        let left = Money::new(left_amount, &left_code);
        let right = Money::new(right_amount, &right_code);

        let result = left.try_add(&right);
        prop_assert_eq!(
            result,
            Err(MoneyError::CurrencyMismatch {
                left: left_code,
                right: right_code,
            })
        );
    }

    /// **Feature: money, Property 3: Same-currency addition sums amounts**
    #[test]
    fn prop_same_currency_addition_sums(
        code in "[A-Z]{3}",
        left_amount in arb_amount(),
        right_amount in arb_amount(),
    ) {
        let left = Money::new(left_amount, &code);
        let right = Money::new(right_amount, &code);

        let sum = left.try_add(&right);
        prop_assert_eq!(sum, Ok(Money::new(left_amount + right_amount, &code)));
    }

    /// **Feature: allocation, Property 4: Percentages sum to 100**
    ///
    /// For any non-empty set of positively valued assets, allocation
    /// percentages must sum to 100% within rounding tolerance.
    #[test]
    fn prop_allocation_percentages_sum_to_100(
        values in arb_asset_values(),
    ) {
        let clock = Arc::new(GenerationClock::new());
        let ledger = Arc::new(MemoryLedger::new(Arc::clone(&clock)));
        let fx = Arc::new(FxService::new(
            Arc::clone(&ledger) as Arc<dyn LedgerReaderTrait>,
            Arc::clone(&clock),
        ));
        let service = ValuationService::new(
            Arc::clone(&ledger) as Arc<dyn LedgerReaderTrait>,
            fx,
            Arc::new(RwLock::new("USD".to_string())),
            clock,
        );

        let acquired = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let valued = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        for (index, value) in values.iter().enumerate() {
            let asset = Asset::new(format!("Asset {index}"), "USD", acquired)
                .with_classes(vec![ClassWeight::new(format!("class-{index}"), dec!(100))]);
            let asset_id = asset.id.clone();
            ledger.add_asset(asset);
            ledger.add_asset_value(AssetValue::new(asset_id, valued, Decimal::from(*value)));
        }

        let as_of = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let allocation = service.asset_allocation(as_of).unwrap();
        let slices = allocation.slices();
        prop_assert_eq!(slices.len(), values.len());

        let total: Decimal = slices.iter().map(|s| s.percentage).sum();
        let error = (total - Decimal::ONE_HUNDRED).abs();
        prop_assert!(
            error <= dec!(0.05),
            "percentages sum to {} for values {:?}",
            total,
            values
        );
    }
}
