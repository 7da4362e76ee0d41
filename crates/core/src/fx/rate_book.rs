use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::fx_model::ExchangeRate;

/// Lookup structure assembled from every recorded exchange rate.
///
/// Each pair is stored as an independent time series. A lookup resolves to
/// the rate with the greatest date not after the requested one; there is no
/// fallback to a later rate and no multi-hop path finding, so a pair with no
/// recorded (or derived inverse) rate simply has no rate.
pub struct RateBook {
    /// Key: (from_currency, to_currency). `BTreeMap` gives O(log n) lookup
    /// of the nearest earlier date.
    rates: HashMap<(String, String), BTreeMap<NaiveDate, Decimal>>,
}

impl RateBook {
    /// Builds the book. Identity pairs and zero rates are skipped. Every
    /// usable record is stored forward and, inverted, for the opposite
    /// direction; a direct record always wins over a derived inverse on the
    /// same date, and among records for the same pair and date the later
    /// one wins.
    pub fn from_rates(rates: &[ExchangeRate]) -> Self {
        let mut book = RateBook {
            rates: HashMap::new(),
        };

        // Derived inverses first, so the forward pass overwrites them.
        for rate in rates {
            if rate.from_currency == rate.to_currency || rate.rate.is_zero() {
                continue;
            }
            book.insert(
                &rate.to_currency,
                &rate.from_currency,
                rate.date,
                Decimal::ONE / rate.rate,
            );
        }
        for rate in rates {
            if rate.from_currency == rate.to_currency || rate.rate.is_zero() {
                continue;
            }
            book.insert(&rate.from_currency, &rate.to_currency, rate.date, rate.rate);
        }

        book
    }

    fn insert(&mut self, from: &str, to: &str, date: NaiveDate, rate: Decimal) {
        self.rates
            .entry((from.to_string(), to.to_string()))
            .or_default()
            .insert(date, rate);
    }

    /// The rate in effect for `from -> to` on `date`: the entry with the
    /// greatest date on or before `date`, if any. Identity pairs are always
    /// one, even with no records at all.
    pub fn rate_on(&self, from: &str, to: &str, date: NaiveDate) -> Option<Decimal> {
        if from == to {
            return Some(Decimal::ONE);
        }

        let key = (from.to_string(), to.to_string());
        let history = self.rates.get(&key)?;
        history.range(..=date).next_back().map(|(_, rate)| *rate)
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
