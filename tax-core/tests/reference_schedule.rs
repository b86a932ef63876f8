//! Behavioural checks of the bracket engine against the 2022 reference schedule.

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tax_core::calculations::common::round_half_up;
use tax_core::{BandTax, ScheduleError, TaxBracket, TaxResult, TaxSchedule, compute};

fn schedule_2022() -> Vec<TaxBracket> {
    vec![
        TaxBracket::bounded(dec!(0), dec!(50197), dec!(0.15)),
        TaxBracket::bounded(dec!(50197), dec!(100392), dec!(0.205)),
        TaxBracket::bounded(dec!(100392), dec!(155625), dec!(0.26)),
        TaxBracket::bounded(dec!(155625), dec!(221708), dec!(0.29)),
        TaxBracket::unbounded(dec!(221708), dec!(0.33)),
    ]
}

#[test]
fn test_repeated_calls_are_identical() {
    let brackets = schedule_2022();

    for income in [dec!(0), dec!(1), dec!(50197), dec!(87654.32), dec!(1000000)] {
        let first = compute(income, &brackets).unwrap();
        let second = compute(income, &brackets).unwrap();
        assert_eq!(first, second, "results differ for income {income}");
    }
}

#[test]
fn test_total_tax_never_decreases_with_income() {
    let schedule = TaxSchedule::new(schedule_2022()).unwrap();

    let mut previous = Decimal::ZERO;
    let mut income = dec!(-1000);
    while income <= dec!(400000) {
        let result = schedule.compute(income);
        assert!(
            result.total_tax >= previous,
            "total tax fell from {previous} to {} at income {income}",
            result.total_tax
        );
        previous = result.total_tax;
        income += dec!(997.13);
    }
}

#[test]
fn test_zero_and_negative_income_owe_nothing() {
    let brackets = schedule_2022();

    assert_eq!(compute(dec!(0), &brackets).unwrap(), TaxResult::zero());
    assert_eq!(compute(dec!(-100), &brackets).unwrap(), TaxResult::zero());
}

#[test]
fn test_income_on_boundary_stays_in_lower_bracket() {
    let brackets = schedule_2022();

    let result = compute(dec!(50197), &brackets).unwrap();

    assert!(!result.per_band.iter().any(|band| band.rate == dec!(0.205)));
    assert_eq!(result.marginal_rate(), Some(dec!(0.15)));
}

#[test]
fn test_open_top_bracket_taxes_everything_above_its_minimum() {
    let brackets = schedule_2022();

    let result = compute(dec!(300000), &brackets).unwrap();

    assert_eq!(
        result.per_band.last(),
        Some(&BandTax {
            rate: dec!(0.33),
            amount: dec!(25836.36)
        })
    );
}

#[test]
fn test_end_to_end_reference_income() {
    let brackets = schedule_2022();

    let result = compute(dec!(100000), &brackets).unwrap();

    assert_eq!(result.per_band.len(), 2);
    assert_eq!(round_half_up(result.per_band[0].amount), dec!(7529.55));
    assert_eq!(round_half_up(result.per_band[1].amount), dec!(10209.62));
    assert_eq!(round_half_up(result.total_tax), dec!(17739.17));
    assert_eq!(round_half_up(result.effective_rate), dec!(17.74));
}

#[test]
fn test_band_amounts_sum_to_total() {
    let brackets = schedule_2022();

    let result = compute(dec!(512345.67), &brackets).unwrap();
    let sum: Decimal = result.per_band.iter().map(|band| band.amount).sum();

    assert_eq!(sum, result.total_tax);
}

#[test]
fn test_overlapping_bands_are_rejected() {
    let mut brackets = schedule_2022();
    brackets[2].min = dec!(90000);

    let result = compute(dec!(100000), &brackets);

    assert!(matches!(result, Err(ScheduleError::NotContiguous { index: 2, .. })));
}

#[test]
fn test_two_unbounded_brackets_are_rejected() {
    let mut brackets = schedule_2022();
    brackets[0].max = None;

    let result = compute(dec!(100000), &brackets);

    assert_eq!(result, Err(ScheduleError::UnboundedBeforeEnd { index: 0 }));
}

#[test]
fn test_result_serializes_with_wire_field_names() {
    let result = compute(dec!(100000), &schedule_2022()).unwrap();

    let json = serde_json::to_value(&result).unwrap();

    assert!(json.get("totalTax").is_some());
    assert!(json.get("perBand").is_some());
    assert!(json.get("effectiveRate").is_some());
}
