use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tax owed on the slice of income that fell inside one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandTax {
    pub rate: Decimal,
    pub amount: Decimal,
}

/// Outcome of one marginal tax calculation.
///
/// Values are unrounded; rounding for display is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxResult {
    pub total_tax: Decimal,

    /// One entry per contributing bracket, in ascending bracket order.
    pub per_band: Vec<BandTax>,

    /// `total_tax / income * 100`, or zero when income is not positive.
    pub effective_rate: Decimal,
}

impl TaxResult {
    /// The result for an income that reaches no bracket.
    pub fn zero() -> Self {
        Self {
            total_tax: Decimal::ZERO,
            per_band: Vec::new(),
            effective_rate: Decimal::ZERO,
        }
    }

    /// Marginal rate of the highest bracket that contributed, if any.
    pub fn marginal_rate(&self) -> Option<Decimal> {
        self.per_band.last().map(|band| band.rate)
    }
}
