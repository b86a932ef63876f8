use anyhow::{Context, Result};
use tax_core::provider::MemoryProviderFactory;
use tax_core::{
    CalculationError, ProviderConfig, ProviderRegistry, ScheduleProvider, TaxCalculator, TaxResult,
};
use tax_data::CsvProviderFactory;
use tax_http::HttpProviderFactory;
use tracing::debug;

use crate::utils::normalize_income_input;

/// Build a [`ProviderRegistry`] with every backend this binary knows about.
pub fn build_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry.register(Box::new(MemoryProviderFactory));
    registry.register(Box::new(CsvProviderFactory));
    registry.register(Box::new(HttpProviderFactory));
    registry
}

/// Opens the provider described by `config`.
pub async fn open_provider(
    registry: &ProviderRegistry,
    config: &ProviderConfig,
) -> Result<Box<dyn ScheduleProvider>> {
    debug!(backend = %config.backend, source = %config.source, "opening schedule provider");
    registry.create(config).await.with_context(|| {
        format!(
            "Failed to open '{}' schedule provider with source '{}'",
            config.backend, config.source
        )
    })
}

/// Runs a single calculation from raw command line input.
pub async fn calculate_once<P: ScheduleProvider>(
    provider: P,
    income: &str,
    tax_year: &str,
) -> Result<TaxResult, CalculationError> {
    let calculator = TaxCalculator::new(provider);
    calculator
        .calculate(&normalize_income_input(income), tax_year)
        .await
}

pub async fn list_years<P: ScheduleProvider + ?Sized>(provider: &P) -> Result<Vec<String>> {
    provider
        .available_years()
        .await
        .context("Failed to list available tax years")
}
