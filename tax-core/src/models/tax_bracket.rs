use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal band of a tax schedule.
///
/// Income falling inside `(min, max]` is taxed at `rate`. The top band of a
/// schedule has no `max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn bounded(
        min: Decimal,
        max: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            min,
            max: Some(max),
            rate,
        }
    }

    pub fn unbounded(
        min: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            min,
            max: None,
            rate,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }
}
