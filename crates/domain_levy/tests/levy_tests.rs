//! Integration tests for the levy billing engine functions

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use core_kernel::{Currency, LevyItemId, LevyScheduleId, Money};
use domain_levy::{allocate, generate_periods, LevyFrequency, OutstandingItem, PeriodStatus};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn aud(amount: rust_decimal::Decimal) -> Money {
    Money::new(amount, Currency::AUD)
}

#[test]
fn test_quarterly_fy2027_schedule_scenario() {
    let periods = generate_periods(
        LevyScheduleId::new(),
        ymd(2026, 7, 1),
        LevyFrequency::Quarterly,
        4,
        31,
    );

    assert_eq!(periods.len(), 4);

    let expected = [
        ("Q1 FY2027", ymd(2026, 7, 1), ymd(2026, 9, 30), ymd(2026, 7, 31)),
        ("Q2 FY2027", ymd(2026, 10, 1), ymd(2026, 12, 31), ymd(2026, 10, 31)),
        ("Q3 FY2027", ymd(2027, 1, 1), ymd(2027, 3, 31), ymd(2027, 1, 31)),
        ("Q4 FY2027", ymd(2027, 4, 1), ymd(2027, 6, 30), ymd(2027, 4, 30)),
    ];

    for (period, (label, start, end, due)) in periods.iter().zip(expected) {
        assert_eq!(period.label, label);
        assert_eq!(period.start_date, start);
        assert_eq!(period.end_date, end);
        assert_eq!(period.due_date, due);
        assert_eq!(period.status, PeriodStatus::Pending);
    }
}

#[test]
fn test_periods_partition_one_year() {
    // Contiguous, non-overlapping, spanning exactly one year, for every
    // supported cardinality and a spread of anchors.
    let starts = [
        ymd(2026, 7, 1),
        ymd(2026, 1, 1),
        ymd(2025, 10, 15),
        ymd(2024, 2, 29),
    ];
    let cardinalities = [
        (LevyFrequency::Annual, 1),
        (LevyFrequency::Quarterly, 2),
        (LevyFrequency::Quarterly, 4),
        (LevyFrequency::Monthly, 12),
    ];

    for start in starts {
        for (frequency, ppy) in cardinalities {
            let periods = generate_periods(LevyScheduleId::new(), start, frequency, ppy, 15);

            assert_eq!(periods.len(), ppy as usize);
            assert_eq!(periods[0].start_date, start);

            for pair in periods.windows(2) {
                assert_eq!(
                    pair[1].start_date,
                    pair[0].end_date.succ_opt().unwrap(),
                    "periods must be contiguous for start={start} ppy={ppy}"
                );
            }

            let last = periods.last().unwrap();
            let year_end = core_kernel::add_months(start, 12).pred_opt().unwrap();
            assert_eq!(last.end_date, year_end);
        }
    }
}

#[test]
fn test_due_day_31_clamps_to_april_30() {
    let periods = generate_periods(
        LevyScheduleId::new(),
        ymd(2026, 4, 1),
        LevyFrequency::Monthly,
        12,
        31,
    );

    assert_eq!(periods[0].due_date, ymd(2026, 4, 30));
    // May has 31 days, so no clamp applies.
    assert_eq!(periods[1].due_date, ymd(2026, 5, 31));
    // February of a non-leap year.
    assert_eq!(periods[10].due_date, ymd(2027, 2, 28));
}

#[test]
fn test_due_day_clamps_in_leap_february() {
    let periods = generate_periods(
        LevyScheduleId::new(),
        ymd(2028, 2, 1),
        LevyFrequency::Monthly,
        12,
        31,
    );
    assert_eq!(periods[0].due_date, ymd(2028, 2, 29));
}

#[test]
fn test_fifo_order_100_50_payment_120() {
    let outstanding = vec![
        OutstandingItem {
            item_id: LevyItemId::new(),
            balance: aud(dec!(100)),
        },
        OutstandingItem {
            item_id: LevyItemId::new(),
            balance: aud(dec!(50)),
        },
    ];

    let outcome = allocate(aud(dec!(120)), &outstanding);

    assert_eq!(outcome.allocations.len(), 2);
    assert_eq!(outcome.allocations[0].amount, aud(dec!(100)));
    assert_eq!(outcome.allocations[1].amount, aud(dec!(20)));
    assert!(outcome.unallocated.is_zero());
}

#[test]
fn test_partial_quarter_scenario_450_450_payment_500() {
    let q1 = LevyItemId::new();
    let q2 = LevyItemId::new();
    let outstanding = vec![
        OutstandingItem {
            item_id: q1,
            balance: aud(dec!(450)),
        },
        OutstandingItem {
            item_id: q2,
            balance: aud(dec!(450)),
        },
    ];

    let outcome = allocate(aud(dec!(500)), &outstanding);

    assert_eq!(outcome.allocations[0].item_id, q1);
    assert_eq!(outcome.allocations[0].amount, aud(dec!(450)));
    assert_eq!(outcome.allocations[1].item_id, q2);
    assert_eq!(outcome.allocations[1].amount, aud(dec!(50)));
    assert!(outcome.unallocated.is_zero());
}

#[test]
fn test_no_outstanding_items_returns_full_remainder() {
    let outcome = allocate(aud(dec!(750)), &[]);
    assert!(outcome.allocations.is_empty());
    assert_eq!(outcome.unallocated, aud(dec!(750)));
}
