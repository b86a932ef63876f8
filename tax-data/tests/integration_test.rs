//! End-to-end tests for CSV schedules served through the calculator.

use std::io::Write as _;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::calculations::common::round_half_up;
use tax_core::provider::ProviderFactory;
use tax_core::{
    CalculationError, ProviderConfig, ProviderError, ProviderRegistry, ScheduleError, TaxCalculator,
    TaxSchedule,
};
use tax_data::{CsvProviderFactory, CsvScheduleProvider, ScheduleLoader};

const TEST_CSV: &str = include_str!("../test-data/schedules.csv");

fn test_data_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-data/schedules.csv")
}

fn csv_config(source: impl Into<String>) -> ProviderConfig {
    ProviderConfig {
        backend: "csv".to_string(),
        source: source.into(),
        timeout_secs: None,
    }
}

/// Writes `contents` to a uniquely named file under the system temp dir.
fn write_temp_csv(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("tax-data-{}-{name}.csv", std::process::id()));
    let mut file = std::fs::File::create(&path).expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    path
}

#[test]
fn test_all_shipped_schedules_are_valid() {
    let schedules = ScheduleLoader::load(TEST_CSV.as_bytes()).expect("Failed to load CSV");

    assert_eq!(schedules.len(), 3);
    for (year, brackets) in schedules {
        let schedule = TaxSchedule::new(brackets);
        assert!(schedule.is_ok(), "schedule {year} is invalid: {schedule:?}");
    }
}

#[tokio::test]
async fn test_reference_income_through_registry() {
    let mut registry = ProviderRegistry::new();
    registry.register(Box::new(CsvProviderFactory));
    let provider = registry
        .create(&csv_config(test_data_path().display().to_string()))
        .await
        .expect("Failed to create csv provider");
    let calculator = TaxCalculator::new(provider);

    let result = calculator
        .calculate("100000", "2022")
        .await
        .expect("Calculation failed");

    assert_eq!(round_half_up(result.total_tax), dec!(17739.17));
    assert_eq!(round_half_up(result.effective_rate), dec!(17.74));
    assert_eq!(result.per_band.len(), 2);
}

#[tokio::test]
async fn test_years_match_file() {
    let provider = CsvScheduleProvider::open(test_data_path())
        .await
        .expect("Failed to open CSV");
    let calculator = TaxCalculator::new(provider);

    let result = calculator.calculate("100000", "1999").await;

    assert_eq!(
        result,
        Err(CalculationError::UnknownTaxYear("1999".to_string()))
    );
}

#[tokio::test]
async fn test_gap_in_file_surfaces_as_invalid_schedule() {
    let path = write_temp_csv(
        "gap",
        "tax_year,min,max,rate\n2022,0,50000,0.15\n2022,60000,,0.2\n",
    );
    let provider = CsvScheduleProvider::open(&path)
        .await
        .expect("Failed to open CSV");
    let calculator = TaxCalculator::new(provider);

    let result = calculator.calculate("75000", "2022").await;
    let _ = std::fs::remove_file(&path);

    assert!(matches!(
        result,
        Err(CalculationError::InvalidSchedule(ScheduleError::NotContiguous { index: 1, .. }))
    ));
}

#[tokio::test]
async fn test_unparseable_file_is_configuration_error() {
    let path = write_temp_csv("garbled", "tax_year,min,max,rate\n2022,zero,100,0.1\n");

    let result = CsvProviderFactory.create(&csv_config(path.display().to_string())).await;
    let _ = std::fs::remove_file(&path);

    assert!(matches!(result.err(), Some(ProviderError::Configuration(_))));
}
