//! Tests for the Money value type.

#[cfg(test)]
mod tests {
    use crate::money::{Money, MoneyError};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::cmp::Ordering;

    // ==================== Arithmetic ====================

    #[test]
    fn test_add_same_currency() {
        let a = Money::new(dec!(10.50), "USD");
        let b = Money::new(dec!(4.25), "USD");
        let sum = a.try_add(&b).unwrap();
        assert_eq!(sum.amount(), dec!(14.75));
        assert_eq!(sum.currency(), "USD");
    }

    #[test]
    fn test_add_mixed_currency_fails() {
        let usd = Money::new(dec!(10), "USD");
        let eur = Money::new(dec!(10), "EUR");
        let err = usd.try_add(&eur).unwrap_err();
        assert_eq!(
            err,
            MoneyError::CurrencyMismatch {
                left: "USD".to_string(),
                right: "EUR".to_string(),
            }
        );
    }

    #[test]
    fn test_sub_keeps_sign() {
        let a = Money::new(dec!(100), "CHF");
        let b = Money::new(dec!(150.40), "CHF");
        let diff = a.try_sub(&b).unwrap();
        assert_eq!(diff.amount(), dec!(-50.40));
        assert!(diff.is_negative());
    }

    #[test]
    fn test_mul_scalar() {
        let principal = Money::new(dec!(1000), "USD");
        let grown = principal.mul_scalar(dec!(1.005)).unwrap();
        assert_eq!(grown.amount(), dec!(1005));
        assert_eq!(grown.currency(), "USD");
    }

    #[test]
    fn test_add_overflow_is_typed() {
        let a = Money::new(Decimal::MAX, "USD");
        let b = Money::new(Decimal::MAX, "USD");
        assert_eq!(a.try_add(&b).unwrap_err(), MoneyError::Overflow("add"));
    }

    // ==================== Comparison ====================

    #[test]
    fn test_cmp_same_currency() {
        let small = Money::new(dec!(1), "USD");
        let large = Money::new(dec!(2), "USD");
        assert_eq!(small.try_cmp(&large).unwrap(), Ordering::Less);
        assert_eq!(large.try_cmp(&small).unwrap(), Ordering::Greater);
        assert_eq!(small.try_cmp(&small).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_cmp_mixed_currency_fails() {
        let usd = Money::new(dec!(1), "USD");
        let gbp = Money::new(dec!(1), "GBP");
        assert!(matches!(
            usd.try_cmp(&gbp),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
    }

    // ==================== Summation ====================

    #[test]
    fn test_sum_homogeneous() {
        let values = vec![
            Money::new(dec!(1.10), "EUR"),
            Money::new(dec!(2.20), "EUR"),
            Money::new(dec!(3.30), "EUR"),
        ];
        let total = Money::sum("EUR", &values).unwrap();
        assert_eq!(total.amount(), dec!(6.60));
    }

    #[test]
    fn test_sum_rejects_stray_currency() {
        let values = vec![Money::new(dec!(1), "EUR"), Money::new(dec!(1), "USD")];
        assert!(matches!(
            Money::sum("EUR", &values),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_sum_empty_is_zero() {
        let total = Money::sum("USD", &[]).unwrap();
        assert!(total.is_zero());
        assert_eq!(total.currency(), "USD");
    }

    // ==================== Display ====================

    #[test]
    fn test_display_rounds_to_cents() {
        let value = Money::new(dec!(1234.5678), "USD");
        assert_eq!(value.to_string(), "1234.57 USD");
    }

    #[test]
    fn test_zero_constructor() {
        let zero = Money::zero("JPY");
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
        assert_eq!(zero.currency(), "JPY");
    }
}
