use std::sync::Arc;

use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;

use super::fx_errors::FxError;
use super::fx_model::{validate_currency_code, RateBookKey};
use super::fx_traits::FxServiceTrait;
use super::rate_book::RateBook;
use crate::cache::{ComputeCache, GenerationClock};
use crate::constants::DECIMAL_PRECISION;
use crate::errors::Result;
use crate::ledger::LedgerReaderTrait;
use crate::money::{Money, MoneyError};

/// Converts amounts between currencies using the recorded rate history.
///
/// The assembled [`RateBook`] is cached; it is rebuilt only after an
/// exchange rate record changes.
pub struct FxService {
    ledger: Arc<dyn LedgerReaderTrait>,
    books: ComputeCache<RateBookKey, Arc<RateBook>>,
}

impl FxService {
    pub fn new(ledger: Arc<dyn LedgerReaderTrait>, clock: Arc<GenerationClock>) -> Self {
        Self {
            ledger,
            books: ComputeCache::new(clock, RateBookKey::DEPENDS_ON),
        }
    }

    fn build_book(&self) -> Result<Arc<RateBook>> {
        let rates = self.ledger.exchange_rates()?;
        let book = RateBook::from_rates(&rates);
        if book.is_empty() {
            warn!("No exchange rates recorded, only identity conversions will succeed");
        }
        Ok(Arc::new(book))
    }
}

impl FxServiceTrait for FxService {
    fn rate_book(&self) -> Result<Arc<RateBook>> {
        self.books.get_or_compute(RateBookKey, || self.build_book())
    }

    fn exchange_rate(
        &self,
        from_currency: &str,
        to_currency: &str,
        date: NaiveDate,
    ) -> Result<Decimal> {
        validate_currency_code(from_currency)?;
        validate_currency_code(to_currency)?;

        if from_currency == to_currency {
            return Ok(Decimal::ONE);
        }

        let book = self.rate_book()?;
        book.rate_on(from_currency, to_currency, date).ok_or_else(|| {
            FxError::RateUnavailable {
                from: from_currency.to_string(),
                to: to_currency.to_string(),
                date,
            }
            .into()
        })
    }

    fn convert(&self, money: &Money, to_currency: &str, date: NaiveDate) -> Result<Money> {
        if money.currency() == to_currency {
            return Ok(money.clone());
        }

        let rate = self.exchange_rate(money.currency(), to_currency, date)?;
        let converted = money
            .amount()
            .checked_mul(rate)
            .ok_or(MoneyError::Overflow("convert"))?
            .round_dp(DECIMAL_PRECISION);
        Ok(Money::new(converted, to_currency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::fx::ExchangeRate;
    use crate::ledger::MemoryLedger;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup(rates: Vec<ExchangeRate>) -> (Arc<MemoryLedger>, FxService) {
        let clock = Arc::new(GenerationClock::new());
        let ledger = Arc::new(MemoryLedger::new(Arc::clone(&clock)));
        for rate in rates {
            ledger.add_exchange_rate(rate);
        }
        let service = FxService::new(Arc::clone(&ledger) as Arc<dyn LedgerReaderTrait>, clock);
        (ledger, service)
    }

    #[test]
    fn test_convert_rounds_to_storage_precision() {
        let (_ledger, service) = setup(vec![ExchangeRate::new(
            "USD",
            "EUR",
            dec!(0.3333333333),
            date(2025, 1, 1),
        )]);

        let converted = service
            .convert(&Money::new(dec!(1), "USD"), "EUR", date(2025, 1, 1))
            .unwrap();
        assert_eq!(converted.amount(), dec!(0.333333));
        assert_eq!(converted.currency(), "EUR");
    }

    #[test]
    fn test_identity_conversion_needs_no_rates() {
        let (_ledger, service) = setup(vec![]);
        let money = Money::new(dec!(15), "JPY");
        let converted = service.convert(&money, "JPY", date(2025, 1, 1)).unwrap();
        assert_eq!(converted, money);
    }

    #[test]
    fn test_missing_rate_is_a_typed_error() {
        let (_ledger, service) = setup(vec![]);
        let result = service.exchange_rate("USD", "EUR", date(2025, 1, 1));
        assert!(matches!(
            result,
            Err(Error::Fx(FxError::RateUnavailable { .. }))
        ));
    }

    #[test]
    fn test_lowercase_code_is_rejected() {
        let (_ledger, service) = setup(vec![]);
        let result = service.exchange_rate("usd", "EUR", date(2025, 1, 1));
        assert!(matches!(
            result,
            Err(Error::Fx(FxError::InvalidCurrencyCode(_)))
        ));
    }

    #[test]
    fn test_new_rate_invalidates_cached_book() {
        let (ledger, service) = setup(vec![ExchangeRate::new(
            "USD",
            "EUR",
            dec!(0.90),
            date(2025, 1, 1),
        )]);

        assert_eq!(
            service
                .exchange_rate("USD", "EUR", date(2025, 6, 1))
                .unwrap(),
            dec!(0.90)
        );

        ledger.add_exchange_rate(ExchangeRate::new(
            "USD",
            "EUR",
            dec!(0.95),
            date(2025, 3, 1),
        ));

        assert_eq!(
            service
                .exchange_rate("USD", "EUR", date(2025, 6, 1))
                .unwrap(),
            dec!(0.95)
        );
    }
}
