//! Marginal (progressive) bracket tax calculation.
//!
//! Income is split across the brackets of a schedule and each slice is taxed
//! at its own bracket's rate:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Walk the brackets in ascending order |
//! | 2    | Stop at the first bracket whose `min` is not below the income |
//! | 3    | Slice = `min(income, max) - min` (`income - min` for the top bracket) |
//! | 4    | Band tax = slice × rate, summed into the total |
//! | 5    | Effective rate = total / income × 100, zero for non-positive income |
//!
//! An income exactly equal to a bracket's `min` does not enter that bracket.
//! Nothing is rounded here; see [`round_half_up`](super::common::round_half_up)
//! for display rounding.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::MarginalTaxCalculator;
//! use tax_core::TaxBracket;
//!
//! let tax_brackets = vec![
//!     TaxBracket::bounded(dec!(0), dec!(50197), dec!(0.15)),
//!     TaxBracket::bounded(dec!(50197), dec!(100392), dec!(0.205)),
//!     TaxBracket::bounded(dec!(100392), dec!(155625), dec!(0.26)),
//!     TaxBracket::bounded(dec!(155625), dec!(221708), dec!(0.29)),
//!     TaxBracket::unbounded(dec!(221708), dec!(0.33)),
//! ];
//!
//! let calculator = MarginalTaxCalculator::new(&tax_brackets);
//! let result = calculator.calculate(dec!(100000)).unwrap();
//!
//! assert_eq!(result.total_tax, dec!(17739.165));
//! assert_eq!(result.per_band.len(), 2);
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::percentage;
use crate::models::{BandTax, ScheduleError, TaxBracket, TaxResult, TaxSchedule, validate_brackets};

/// Calculator for marginal bracket tax over a borrowed bracket list.
///
/// The brackets are validated on every [`calculate`](Self::calculate) call.
/// Use [`TaxSchedule::compute`] to validate once and compute many times.
#[derive(Debug, Clone)]
pub struct MarginalTaxCalculator<'a> {
    tax_brackets: &'a [TaxBracket],
}

impl<'a> MarginalTaxCalculator<'a> {
    /// Creates a calculator over `tax_brackets`, which should be sorted by
    /// `min` and end with a single unbounded bracket.
    pub fn new(tax_brackets: &'a [TaxBracket]) -> Self {
        Self { tax_brackets }
    }

    /// Calculates the tax owed on `income`.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] if the brackets break any schedule invariant.
    pub fn calculate(
        &self,
        income: Decimal,
    ) -> Result<TaxResult, ScheduleError> {
        validate_brackets(self.tax_brackets)?;
        Ok(apply_brackets(self.tax_brackets, income))
    }
}

impl TaxSchedule {
    /// Calculates the tax owed on `income` under this schedule.
    pub fn compute(
        &self,
        income: Decimal,
    ) -> TaxResult {
        apply_brackets(self.brackets(), income)
    }
}

/// Validates `brackets` and calculates the tax owed on `income`.
pub fn compute(
    income: Decimal,
    brackets: &[TaxBracket],
) -> Result<TaxResult, ScheduleError> {
    MarginalTaxCalculator::new(brackets).calculate(income)
}

/// Single pass over already-validated brackets.
fn apply_brackets(
    brackets: &[TaxBracket],
    income: Decimal,
) -> TaxResult {
    let mut total_tax = Decimal::ZERO;
    let mut per_band = Vec::new();

    for bracket in brackets {
        if income <= bracket.min {
            break;
        }

        let amount = band_tax(taxable_slice(bracket, income), bracket.rate);
        total_tax += amount;
        per_band.push(BandTax {
            rate: bracket.rate,
            amount,
        });
    }

    TaxResult {
        total_tax,
        per_band,
        effective_rate: effective_rate(total_tax, income),
    }
}

/// Portion of `income` that falls inside `bracket`. Callers guarantee
/// `income > bracket.min`.
fn taxable_slice(
    bracket: &TaxBracket,
    income: Decimal,
) -> Decimal {
    let ceiling = match bracket.max {
        Some(max) => income.min(max),
        None => income,
    };
    ceiling - bracket.min
}

fn band_tax(
    slice: Decimal,
    rate: Decimal,
) -> Decimal {
    slice * rate
}

fn effective_rate(
    total_tax: Decimal,
    income: Decimal,
) -> Decimal {
    percentage(total_tax, income)
}
