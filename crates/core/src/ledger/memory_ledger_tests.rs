//! Tests for the in-memory ledger stores and their write-then-bump contract.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use crate::cache::GenerationClock;
use crate::fx::ExchangeRate;
use crate::ledger::{
    Account, AccountKind, AssetClass, DateRange, Debt, DebtDirection, EntityKind, FlowKind,
    FlowRecord, LedgerReaderTrait, MemoryLedger,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn setup() -> (Arc<GenerationClock>, MemoryLedger) {
    let clock = Arc::new(GenerationClock::new());
    let ledger = MemoryLedger::new(Arc::clone(&clock));
    (clock, ledger)
}

// ==================== Kind-erased listing ====================

#[test]
fn test_list_records_orders_by_date_then_id() {
    let (_clock, ledger) = setup();
    let mut second = FlowRecord::new("Rent", dec!(900), "USD", date(2025, 3, 5));
    second.id = "b".to_string();
    let mut first = FlowRecord::new("Groceries", dec!(120), "USD", date(2025, 3, 5));
    first.id = "a".to_string();
    let earliest = FlowRecord::new("Coffee", dec!(4), "USD", date(2025, 3, 1));
    let earliest_id = earliest.id.clone();

    ledger.add_flow(FlowKind::Expense, second);
    ledger.add_flow(FlowKind::Expense, earliest);
    ledger.add_flow(FlowKind::Expense, first);

    let range = DateRange::new(date(2025, 3, 1), date(2025, 4, 1)).unwrap();
    let records = ledger.list_records(EntityKind::Expense, &range).unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.record_id()).collect();
    assert_eq!(ids, vec![earliest_id.as_str(), "a", "b"]);
}

#[test]
fn test_list_records_honors_the_half_open_range() {
    let (_clock, ledger) = setup();
    ledger.add_flow(
        FlowKind::Income,
        FlowRecord::new("Before", dec!(1), "USD", date(2025, 2, 28)),
    );
    ledger.add_flow(
        FlowKind::Income,
        FlowRecord::new("On start", dec!(2), "USD", date(2025, 3, 1)),
    );
    ledger.add_flow(
        FlowKind::Income,
        FlowRecord::new("On end", dec!(3), "USD", date(2025, 4, 1)),
    );

    let range = DateRange::new(date(2025, 3, 1), date(2025, 4, 1)).unwrap();
    let records = ledger.list_records(EntityKind::Income, &range).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_date(), Some(date(2025, 3, 1)));
}

#[test]
fn test_undated_class_records_ignore_the_range() {
    let (_clock, ledger) = setup();
    ledger.add_asset_class(AssetClass::new("Equities"));

    // A window decades away still returns the class.
    let range = DateRange::new(date(1990, 1, 1), date(1990, 2, 1)).unwrap();
    let records = ledger.list_records(EntityKind::AssetClass, &range).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_date(), None);
}

// ==================== Exact-date rate accessor ====================

#[test]
fn test_exchange_rate_accessor_matches_exact_dates_only() {
    let (_clock, ledger) = setup();
    ledger.add_exchange_rate(ExchangeRate::new("USD", "EUR", dec!(0.90), date(2025, 3, 1)));

    assert_eq!(
        ledger.exchange_rate("USD", "EUR", date(2025, 3, 1)).unwrap(),
        Some(dec!(0.90))
    );
    // The store does no nearest-earlier fallback.
    assert_eq!(
        ledger.exchange_rate("USD", "EUR", date(2025, 3, 2)).unwrap(),
        None
    );
}

#[test]
fn test_exchange_rate_accessor_prefers_the_latest_duplicate() {
    let (_clock, ledger) = setup();
    ledger.add_exchange_rate(ExchangeRate::new("USD", "EUR", dec!(0.90), date(2025, 3, 1)));
    ledger.add_exchange_rate(ExchangeRate::new("USD", "EUR", dec!(0.95), date(2025, 3, 1)));

    assert_eq!(
        ledger.exchange_rate("USD", "EUR", date(2025, 3, 1)).unwrap(),
        Some(dec!(0.95))
    );
}

// ==================== Typed stores ====================

#[test]
fn test_list_debts_returns_recorded_debts() {
    let (_clock, ledger) = setup();
    ledger.add_debt(Debt::new(
        DebtDirection::Lent,
        "Alice",
        dec!(250),
        "USD",
        date(2025, 2, 1),
    ));

    let debts = ledger.list_debts().unwrap();
    assert_eq!(debts.len(), 1);
    assert_eq!(debts[0].counterparty, "Alice");
    assert_eq!(debts[0].direction, DebtDirection::Lent);
    assert_eq!(debts[0].amount_money().amount(), dec!(250));
    assert!(!debts[0].paid);
}

#[test]
fn test_remove_flow_reports_whether_one_existed() {
    let (_clock, ledger) = setup();
    let flow = FlowRecord::new("Groceries", dec!(120), "USD", date(2025, 3, 10));
    let id = flow.id.clone();
    ledger.add_flow(FlowKind::Expense, flow);

    assert!(ledger.remove_flow(FlowKind::Expense, &id));
    assert!(!ledger.remove_flow(FlowKind::Expense, &id));

    let range = DateRange::new(date(2025, 3, 1), date(2025, 4, 1)).unwrap();
    assert!(ledger.flows_in(FlowKind::Expense, &range).unwrap().is_empty());
}

#[test]
fn test_upsert_account_replaces_by_id() {
    let (_clock, ledger) = setup();
    let mut account = Account::new(
        "Checking",
        AccountKind::Cash,
        "USD",
        dec!(1000),
        date(2020, 1, 1),
    );
    ledger.upsert_account(account.clone());

    account.balance = dec!(1250);
    ledger.upsert_account(account);

    let accounts = ledger.list_accounts().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].balance, dec!(1250));
}

// ==================== Write-then-bump contract ====================

#[test]
fn test_writers_announce_through_the_clock() {
    let (clock, ledger) = setup();
    let stamp = clock.snapshot();

    ledger.add_debt(Debt::new(
        DebtDirection::Borrowed,
        "Bank",
        dec!(5000),
        "USD",
        date(2025, 1, 1),
    ));

    let current = clock.snapshot();
    assert!(!stamp.matches(&current, &[EntityKind::Debt]));
    assert!(stamp.matches(&current, &[EntityKind::Account]));
}

#[test]
fn test_removing_a_missing_flow_does_not_bump() {
    let (clock, ledger) = setup();
    let stamp = clock.snapshot();

    assert!(!ledger.remove_flow(FlowKind::Income, "no-such-id"));

    assert!(stamp.matches(&clock.snapshot(), &[EntityKind::Income]));
}
