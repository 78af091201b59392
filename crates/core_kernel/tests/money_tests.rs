//! Tests for money types and the rounding discipline

use core_kernel::{Currency, Money, MoneyError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_construction_rounds_immediately() {
    // Rounding happens on construction, not at display time.
    let m = Money::new(dec!(33.333333), Currency::AUD);
    assert_eq!(m.amount(), dec!(33.33));

    let m = Money::new(dec!(0.005), Currency::AUD);
    assert_eq!(m.amount(), dec!(0.01));
}

#[test]
fn test_every_operation_rounds() {
    let third = Money::new(dec!(100), Currency::AUD).divide(dec!(3)).unwrap();
    assert_eq!(third.amount(), dec!(33.33));

    let scaled = Money::new(dec!(10.01), Currency::AUD).multiply(dec!(0.333));
    assert_eq!(scaled.amount(), dec!(3.33));
}

#[test]
fn test_thousand_cents_sum_exactly() {
    let mut total = Money::zero(Currency::AUD);
    for _ in 0..1000 {
        total = total + Money::new(dec!(0.01), Currency::AUD);
    }
    assert_eq!(total.amount(), dec!(10.00));
}

#[test]
fn test_signs() {
    assert!(Money::new(dec!(5), Currency::AUD).is_positive());
    assert!(Money::new(dec!(-5), Currency::AUD).is_negative());
    assert!(Money::zero(Currency::AUD).is_zero());
    assert!(!Money::zero(Currency::AUD).is_positive());
    assert!(!Money::zero(Currency::AUD).is_negative());
}

#[test]
fn test_abs_and_neg() {
    let m = Money::new(dec!(-12.34), Currency::AUD);
    assert_eq!(m.abs().amount(), dec!(12.34));
    assert_eq!((-m).amount(), dec!(12.34));
}

#[test]
fn test_comparison_same_currency() {
    let a = Money::new(dec!(10), Currency::AUD);
    let b = Money::new(dec!(20), Currency::AUD);
    assert!(a < b);
    assert!(b > a);
}

#[test]
fn test_comparison_cross_currency_is_none() {
    let a = Money::new(dec!(10), Currency::AUD);
    let b = Money::new(dec!(10), Currency::USD);
    assert_eq!(a.partial_cmp(&b), None);
}

#[test]
fn test_checked_sub_mismatch() {
    let a = Money::new(dec!(10), Currency::AUD);
    let b = Money::new(dec!(10), Currency::NZD);
    assert!(matches!(
        a.checked_sub(&b),
        Err(MoneyError::CurrencyMismatch(_, _))
    ));
}

#[test]
fn test_from_minor_units() {
    assert_eq!(Money::from_minor(12345, Currency::AUD).amount(), dec!(123.45));
    assert_eq!(Money::from_minor(-50, Currency::AUD).amount(), dec!(-0.50));
}

#[test]
fn test_display() {
    let m = Money::new(dec!(1234.5), Currency::AUD);
    assert_eq!(m.to_string(), "A$ 1234.50");
}

#[test]
fn test_serde_round_trip() {
    let m = Money::new(dec!(99.95), Currency::AUD);
    let json = serde_json::to_string(&m).unwrap();
    let back: Money = serde_json::from_str(&json).unwrap();
    assert_eq!(back, m);
}

#[test]
fn test_zero_amount_decimal() {
    assert_eq!(Money::zero(Currency::AUD).amount(), Decimal::ZERO);
}
