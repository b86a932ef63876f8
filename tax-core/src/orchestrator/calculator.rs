use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{ScheduleError, TaxResult, TaxSchedule};
use crate::provider::{ProviderError, ScheduleProvider};

/// Errors surfaced to the presentation layer for one calculation request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// Income or tax year was left blank.
    #[error("Please enter both the annual income and tax year")]
    MissingInput,

    /// Income was present but is not a number.
    #[error("'{0}' is not a valid annual income")]
    InvalidIncome(String),

    #[error("No tax schedule is available for tax year {0}")]
    UnknownTaxYear(String),

    #[error("Tax schedule could not be retrieved: {0}")]
    ScheduleUnavailable(String),

    #[error("Invalid tax schedule: {0}")]
    InvalidSchedule(#[from] ScheduleError),

    /// A newer submission replaced this one before it completed.
    #[error("Calculation {request_id} was superseded by a newer request")]
    Superseded { request_id: u64 },
}

impl From<ProviderError> for CalculationError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::UnknownTaxYear(year) => CalculationError::UnknownTaxYear(year),
            ProviderError::Unavailable(reason) | ProviderError::Configuration(reason) => {
                CalculationError::ScheduleUnavailable(reason)
            }
        }
    }
}

/// Bridges raw user input to the bracket engine.
///
/// Each call checks the inputs, fetches the schedule for the requested
/// year, validates it and computes the result. Nothing is cached between
/// calls.
#[derive(Debug, Clone)]
pub struct TaxCalculator<P> {
    provider: P,
}

impl<P: ScheduleProvider> TaxCalculator<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Calculates the tax owed for the raw `income` and `tax_year` strings.
    ///
    /// # Errors
    ///
    /// * [`CalculationError::MissingInput`]: either field is blank; the
    ///   provider is not consulted.
    /// * [`CalculationError::InvalidIncome`]: income is not a number.
    /// * [`CalculationError::UnknownTaxYear`] /
    ///   [`CalculationError::ScheduleUnavailable`]: the provider failed.
    /// * [`CalculationError::InvalidSchedule`]: the provider returned
    ///   brackets that break a schedule invariant.
    pub async fn calculate(
        &self,
        income: &str,
        tax_year: &str,
    ) -> Result<TaxResult, CalculationError> {
        let income = parse_inputs(income, tax_year)?;
        self.calculate_for_year(income, tax_year.trim()).await
    }

    /// Fetches and validates the schedule for `tax_year`, then computes.
    pub async fn calculate_for_year(
        &self,
        income: Decimal,
        tax_year: &str,
    ) -> Result<TaxResult, CalculationError> {
        let schedule = self.load_schedule(tax_year).await?;
        let result = schedule.compute(income);

        info!(
            tax_year,
            total_tax = %result.total_tax,
            bands = result.per_band.len(),
            "calculation complete"
        );
        Ok(result)
    }

    /// Retrieves the brackets for `tax_year` and checks every invariant.
    pub async fn load_schedule(
        &self,
        tax_year: &str,
    ) -> Result<TaxSchedule, CalculationError> {
        debug!(tax_year, "requesting schedule");
        let brackets = self.provider.get_schedule(tax_year).await.map_err(|e| {
            warn!(tax_year, error = %e, "schedule retrieval failed");
            CalculationError::from(e)
        })?;

        TaxSchedule::new(brackets).map_err(|e| {
            warn!(tax_year, error = %e, "provider returned an invalid schedule");
            CalculationError::InvalidSchedule(e)
        })
    }
}

/// Checks that both fields are present and parses the income.
pub fn parse_inputs(
    income: &str,
    tax_year: &str,
) -> Result<Decimal, CalculationError> {
    let income = income.trim();
    if income.is_empty() || tax_year.trim().is_empty() {
        return Err(CalculationError::MissingInput);
    }

    income
        .parse::<Decimal>()
        .map_err(|_| CalculationError::InvalidIncome(income.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::common::round_half_up;
    use crate::models::TaxBracket;
    use crate::provider::InMemoryScheduleProvider;

    /// Counts lookups so tests can prove the provider was never reached.
    struct CountingProvider {
        inner: InMemoryScheduleProvider,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ScheduleProvider for CountingProvider {
        async fn get_schedule(
            &self,
            tax_year: &str,
        ) -> Result<Vec<TaxBracket>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get_schedule(tax_year).await
        }

        async fn available_years(&self) -> Result<Vec<String>, ProviderError> {
            self.inner.available_years().await
        }
    }

    struct OfflineProvider;

    #[async_trait]
    impl ScheduleProvider for OfflineProvider {
        async fn get_schedule(
            &self,
            _tax_year: &str,
        ) -> Result<Vec<TaxBracket>, ProviderError> {
            Err(ProviderError::Unavailable("connection refused".to_string()))
        }

        async fn available_years(&self) -> Result<Vec<String>, ProviderError> {
            Err(ProviderError::Unavailable("connection refused".to_string()))
        }
    }

    fn builtin_calculator() -> TaxCalculator<CountingProvider> {
        TaxCalculator::new(CountingProvider {
            inner: InMemoryScheduleProvider::builtin(),
            calls: AtomicUsize::new(0),
        })
    }

    // =========================================================================
    // parse_inputs tests
    // =========================================================================

    #[test]
    fn parse_inputs_accepts_plain_number() {
        assert_eq!(parse_inputs("100000", "2022"), Ok(dec!(100000)));
    }

    #[test]
    fn parse_inputs_trims_whitespace() {
        assert_eq!(parse_inputs("  72500.50 ", "2022"), Ok(dec!(72500.50)));
    }

    #[test]
    fn parse_inputs_rejects_blank_income() {
        assert_eq!(parse_inputs("   ", "2022"), Err(CalculationError::MissingInput));
    }

    #[test]
    fn parse_inputs_rejects_blank_year() {
        assert_eq!(parse_inputs("100000", ""), Err(CalculationError::MissingInput));
    }

    #[test]
    fn parse_inputs_rejects_non_numeric_income() {
        assert_eq!(
            parse_inputs("lots", "2022"),
            Err(CalculationError::InvalidIncome("lots".to_string()))
        );
    }

    #[test]
    fn parse_inputs_accepts_negative_income() {
        assert_eq!(parse_inputs("-100", "2022"), Ok(dec!(-100)));
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[tokio::test]
    async fn calculate_reference_scenario() {
        let calculator = builtin_calculator();

        let result = calculator.calculate("100000", "2022").await.unwrap();

        assert_eq!(round_half_up(result.total_tax), dec!(17739.17));
        assert_eq!(round_half_up(result.effective_rate), dec!(17.74));
        assert_eq!(result.per_band.len(), 2);
    }

    #[tokio::test]
    async fn missing_input_never_reaches_provider() {
        let calculator = builtin_calculator();

        let result = calculator.calculate("", "").await;

        assert_eq!(result, Err(CalculationError::MissingInput));
        assert_eq!(calculator.provider().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_income_never_reaches_provider() {
        let calculator = builtin_calculator();

        let result = calculator.calculate("12,34x", "2022").await;

        assert!(matches!(result, Err(CalculationError::InvalidIncome(_))));
        assert_eq!(calculator.provider().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_year_is_surfaced() {
        let calculator = builtin_calculator();

        let result = calculator.calculate("100000", "1999").await;

        assert_eq!(result, Err(CalculationError::UnknownTaxYear("1999".to_string())));
    }

    #[tokio::test]
    async fn provider_outage_is_schedule_unavailable() {
        let calculator = TaxCalculator::new(OfflineProvider);

        let result = calculator.calculate("100000", "2022").await;

        assert_eq!(
            result,
            Err(CalculationError::ScheduleUnavailable("connection refused".to_string()))
        );
    }

    #[tokio::test]
    async fn invalid_schedule_is_surfaced_verbatim() {
        let provider = InMemoryScheduleProvider::new().with_schedule(
            "2022",
            vec![
                TaxBracket::unbounded(dec!(0), dec!(0.15)),
                TaxBracket::unbounded(dec!(50197), dec!(0.205)),
            ],
        );
        let calculator = TaxCalculator::new(provider);

        let result = calculator.calculate("100000", "2022").await;

        assert_eq!(
            result,
            Err(CalculationError::InvalidSchedule(
                ScheduleError::UnboundedBeforeEnd { index: 0 }
            ))
        );
    }

    #[tokio::test]
    async fn year_is_trimmed_before_lookup() {
        let calculator = builtin_calculator();

        let result = calculator.calculate("100000", " 2022\n").await;

        assert!(result.is_ok());
    }

    // =========================================================================
    // error conversion tests
    // =========================================================================

    #[test]
    fn configuration_error_maps_to_unavailable() {
        let err = CalculationError::from(ProviderError::Configuration("bad url".to_string()));

        assert_eq!(err, CalculationError::ScheduleUnavailable("bad url".to_string()));
    }

    #[test]
    fn missing_input_message_matches_prompt() {
        assert_eq!(
            CalculationError::MissingInput.to_string(),
            "Please enter both the annual income and tax year"
        );
    }
}
