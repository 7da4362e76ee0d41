//! Fortuna Core - cached aggregation and projection over a personal
//! finance ledger.
//!
//! This crate contains the derived-data engines: generation-stamped
//! caching, currency conversion, net worth and allocation valuation,
//! period summaries, and the retirement projection. It is storage-agnostic
//! and reads records through the [`ledger::LedgerReaderTrait`] contract.

pub mod cache;
pub mod constants;
pub mod errors;
pub mod forecast;
pub mod fx;
pub mod ledger;
pub mod money;
pub mod settings;
pub mod summary;
pub mod valuation;

// Re-export common types from the ledger and money modules
pub use ledger::*;
pub use money::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
