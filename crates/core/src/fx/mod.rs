//! FX module - manually recorded exchange rates and currency conversion.

mod fx_errors;
mod fx_model;
mod fx_service;
mod fx_traits;
mod rate_book;

pub use fx_errors::FxError;
pub use fx_model::{ExchangeRate, RateBookKey};
pub use fx_service::FxService;
pub use fx_traits::FxServiceTrait;
pub use rate_book::RateBook;
