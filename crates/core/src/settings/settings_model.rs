//! Runtime configuration model.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::forecast::Assumptions;

/// Reference currency and default simulation assumptions.
///
/// The serving layer persists this and hands the reference currency to the
/// services as `Arc<RwLock<String>>`; the core never stores settings itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub base_currency: String,
    pub annual_return_rate: Decimal,
    pub annual_inflation_rate: Decimal,
    pub target_monthly_spending: Decimal,
    pub safe_withdrawal_rate: Decimal,
    pub life_expectancy_years: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_currency: "USD".to_string(),
            annual_return_rate: dec!(0.05),
            annual_inflation_rate: dec!(0.02),
            target_monthly_spending: Decimal::ZERO,
            safe_withdrawal_rate: dec!(4),
            life_expectancy_years: 30,
        }
    }
}

impl Settings {
    /// Default assumptions for forecast calls, overridable per call.
    pub fn assumptions(&self) -> Assumptions {
        Assumptions {
            annual_return_rate: self.annual_return_rate,
            annual_inflation_rate: self.annual_inflation_rate,
            target_monthly_spending: self.target_monthly_spending,
            safe_withdrawal_rate: self.safe_withdrawal_rate,
            horizon_years: self.life_expectancy_years,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_currency.len() != 3
            || !self.base_currency.chars().all(|c| c.is_ascii_uppercase())
        {
            return Err(Error::Validation(format!(
                "'{}' is not a 3-letter uppercase currency code",
                self.base_currency
            )));
        }
        self.assumptions().validate()?;
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Settings> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastError;

    #[test]
    fn test_default_settings_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.base_currency, "USD");
        assert_eq!(settings.assumptions().horizon_years, 30);
    }

    #[test]
    fn test_json_round_trip_uses_camel_case() {
        let settings = Settings {
            base_currency: "EUR".to_string(),
            target_monthly_spending: dec!(1500),
            ..Settings::default()
        };

        let json = settings.to_json().unwrap();
        assert!(json.contains("baseCurrency"));
        assert!(json.contains("lifeExpectancyYears"));

        let parsed = Settings::from_json(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_rejects_lowercase_currency() {
        let settings = Settings {
            base_currency: "usd".to_string(),
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_rejects_a_zero_horizon() {
        let settings = Settings {
            life_expectancy_years: 0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(Error::Forecast(ForecastError::InvalidAssumptions(_)))
        ));
    }

    #[test]
    fn test_malformed_json_is_a_validation_error() {
        let result = Settings::from_json("{\"baseCurrency\":");
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
