use async_trait::async_trait;
use thiserror::Error;

use crate::models::TaxBracket;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Unknown tax year: {0}")]
    UnknownTaxYear(String),

    #[error("Schedule source unavailable: {0}")]
    Unavailable(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Source of bracket schedules keyed by tax year.
///
/// Implementations return brackets as published; they are validated by the
/// caller before any tax is computed.
#[async_trait]
pub trait ScheduleProvider: Send + Sync {
    async fn get_schedule(
        &self,
        tax_year: &str,
    ) -> Result<Vec<TaxBracket>, ProviderError>;

    /// Tax years this provider can serve, sorted ascending.
    async fn available_years(&self) -> Result<Vec<String>, ProviderError>;
}

#[async_trait]
impl<P: ScheduleProvider + ?Sized> ScheduleProvider for Box<P> {
    async fn get_schedule(
        &self,
        tax_year: &str,
    ) -> Result<Vec<TaxBracket>, ProviderError> {
        (**self).get_schedule(tax_year).await
    }

    async fn available_years(&self) -> Result<Vec<String>, ProviderError> {
        (**self).available_years().await
    }
}

#[async_trait]
impl<P: ScheduleProvider + ?Sized> ScheduleProvider for std::sync::Arc<P> {
    async fn get_schedule(
        &self,
        tax_year: &str,
    ) -> Result<Vec<TaxBracket>, ProviderError> {
        (**self).get_schedule(tax_year).await
    }

    async fn available_years(&self) -> Result<Vec<String>, ProviderError> {
        (**self).available_years().await
    }
}
