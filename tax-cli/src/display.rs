//! Text rendering for results, errors and progress.
//!
//! Amounts are rounded half-up to cents here and nowhere else.

use std::fmt::Write as _;

use rust_decimal::Decimal;
use tax_core::calculations::common::round_half_up;
use tax_core::{CalculationError, CalculationState, TaxResult};

pub const LOADING_LINE: &str = "Calculating...";

/// `$1234.50` style currency.
pub fn format_money(amount: Decimal) -> String {
    format!("${:.2}", round_half_up(amount))
}

/// A bracket rate as a percentage without trailing zeros: `0.205` is `20.5%`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

/// An effective rate that is already a percentage, to two places.
pub fn format_percentage(percentage: Decimal) -> String {
    format!("{:.2}%", round_half_up(percentage))
}

pub fn render_result(result: &TaxResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total Tax: {}", format_money(result.total_tax));
    let _ = writeln!(out, "Effective Rate: {}", format_percentage(result.effective_rate));
    let _ = writeln!(out, "Taxes Owed Per Band:");

    if result.per_band.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (i, band) in result.per_band.iter().enumerate() {
        let _ = writeln!(
            out,
            "  Band {} ({}): {}",
            i + 1,
            format_rate(band.rate),
            format_money(band.amount)
        );
    }
    out
}

pub fn render_json(result: &TaxResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

pub fn render_error(error: &CalculationError) -> String {
    format!("Error: {error}")
}

/// Renders what the user should see for `state`, if anything.
pub fn render_state(state: &CalculationState) -> Option<String> {
    match state {
        CalculationState::Idle => None,
        CalculationState::Validating { .. } | CalculationState::Loading { .. } => {
            Some(LOADING_LINE.to_string())
        }
        CalculationState::Success { result, .. } => Some(render_result(result)),
        CalculationState::Error { error, .. } => Some(render_error(error)),
    }
}

pub fn render_years(years: &[String]) -> String {
    if years.is_empty() {
        return "No tax years available.\n".to_string();
    }
    let mut out = String::from("Available tax years:\n");
    for year in years {
        let _ = writeln!(out, "  {year}");
    }
    out
}
