//! Static, in-process schedule table.

use std::collections::BTreeMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::factory::{ProviderConfig, ProviderFactory};
use super::schedule_provider::{ProviderError, ScheduleProvider};
use crate::models::TaxBracket;

/// Federal schedules shipped with the crate: `(year, [(min, max, rate)])`,
/// amounts in whole dollars and rates in thousandths.
const BUILTIN_SCHEDULES: &[(&str, &[(i64, Option<i64>, i64)])] = &[
    (
        "2022",
        &[
            (0, Some(50_197), 150),
            (50_197, Some(100_392), 205),
            (100_392, Some(155_625), 260),
            (155_625, Some(221_708), 290),
            (221_708, None, 330),
        ],
    ),
    (
        "2023",
        &[
            (0, Some(53_359), 150),
            (53_359, Some(106_717), 205),
            (106_717, Some(165_430), 260),
            (165_430, Some(235_675), 290),
            (235_675, None, 330),
        ],
    ),
    (
        "2024",
        &[
            (0, Some(55_867), 150),
            (55_867, Some(111_733), 205),
            (111_733, Some(173_205), 260),
            (173_205, Some(246_752), 290),
            (246_752, None, 330),
        ],
    ),
];

/// A [`ScheduleProvider`] backed by a map held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScheduleProvider {
    schedules: BTreeMap<String, Vec<TaxBracket>>,
}

impl InMemoryScheduleProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider preloaded with the built-in 2022 to 2024 federal schedules.
    pub fn builtin() -> Self {
        let mut provider = Self::new();
        for (year, rows) in BUILTIN_SCHEDULES {
            let brackets = rows
                .iter()
                .map(|&(min, max, rate)| TaxBracket {
                    min: Decimal::from(min),
                    max: max.map(Decimal::from),
                    rate: Decimal::new(rate, 3),
                })
                .collect();
            provider.insert(*year, brackets);
        }
        provider
    }

    pub fn with_schedule(
        mut self,
        tax_year: impl Into<String>,
        brackets: Vec<TaxBracket>,
    ) -> Self {
        self.insert(tax_year, brackets);
        self
    }

    /// Adds or replaces the schedule for `tax_year`.
    pub fn insert(
        &mut self,
        tax_year: impl Into<String>,
        brackets: Vec<TaxBracket>,
    ) {
        self.schedules.insert(tax_year.into(), brackets);
    }
}

#[async_trait]
impl ScheduleProvider for InMemoryScheduleProvider {
    async fn get_schedule(
        &self,
        tax_year: &str,
    ) -> Result<Vec<TaxBracket>, ProviderError> {
        self.schedules
            .get(tax_year.trim())
            .cloned()
            .ok_or_else(|| ProviderError::UnknownTaxYear(tax_year.to_string()))
    }

    async fn available_years(&self) -> Result<Vec<String>, ProviderError> {
        Ok(self.schedules.keys().cloned().collect())
    }
}

/// [`ProviderFactory`] for the `"memory"` backend.
///
/// Accepted `source` values:
/// * `"builtin"`: the schedules shipped with the crate.
/// * `"empty"`: no schedules at all; every year is unknown.
pub struct MemoryProviderFactory;

#[async_trait]
impl ProviderFactory for MemoryProviderFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        config: &ProviderConfig,
    ) -> Result<Box<dyn ScheduleProvider>, ProviderError> {
        match config.source.as_str() {
            "builtin" => Ok(Box::new(InMemoryScheduleProvider::builtin())),
            "empty" => Ok(Box::new(InMemoryScheduleProvider::new())),
            other => Err(ProviderError::Configuration(format!(
                "memory backend has no table named '{other}'; expected 'builtin' or 'empty'"
            ))),
        }
    }
}
