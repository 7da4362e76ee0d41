//! Ledger module - record models, read-only access traits, and the
//! in-memory reference store.

mod ledger_model;
mod ledger_traits;
mod memory_ledger;

#[cfg(test)]
mod memory_ledger_tests;

// Re-export the public interface
pub use ledger_model::{
    Account, AccountKind, Asset, AssetClass, AssetValue, ClassWeight, DateRange, Debt,
    DebtDirection, EntityKind, FlowKind, FlowRecord, Liability, Record, Recurrence,
};
pub use ledger_traits::LedgerReaderTrait;
pub use memory_ledger::MemoryLedger;
