use std::collections::BTreeMap;
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::TaxBracket;
use thiserror::Error;

/// Errors that can occur when loading schedule data.
#[derive(Debug, Error)]
pub enum ScheduleLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<csv::Error> for ScheduleLoaderError {
    fn from(err: csv::Error) -> Self {
        ScheduleLoaderError::CsvParse(err.to_string())
    }
}

impl From<std::io::Error> for ScheduleLoaderError {
    fn from(err: std::io::Error) -> Self {
        ScheduleLoaderError::Io(err.to_string())
    }
}

/// A single record from a schedule CSV file.
///
/// - `tax_year`: The tax year identifier (e.g., 2022)
/// - `min`: The lower bound of this bracket
/// - `max`: The upper bound of this bracket (empty for the top bracket)
/// - `rate`: The marginal tax rate as a fraction (e.g., 0.205 for 20.5%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScheduleRecord {
    pub tax_year: String,
    pub min: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max: Option<Decimal>,
    pub rate: Decimal,
}

impl From<&ScheduleRecord> for TaxBracket {
    fn from(record: &ScheduleRecord) -> Self {
        TaxBracket {
            min: record.min,
            max: record.max,
            rate: record.rate,
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for bracket schedules stored as CSV.
///
/// Each row is one bracket; rows sharing a `tax_year` form that year's
/// schedule in file order. Rows are not validated here, so a file with a
/// malformed schedule still loads and the problem surfaces when the
/// schedule is used.
pub struct ScheduleLoader;

impl ScheduleLoader {
    /// Parse schedule records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file
    /// or a byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ScheduleRecord>, ScheduleLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: ScheduleRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records into one bracket list per tax year.
    ///
    /// Brackets keep the order in which they appear in the file.
    pub fn group(records: &[ScheduleRecord]) -> BTreeMap<String, Vec<TaxBracket>> {
        let mut schedules: BTreeMap<String, Vec<TaxBracket>> = BTreeMap::new();

        for record in records {
            schedules
                .entry(record.tax_year.clone())
                .or_default()
                .push(TaxBracket::from(record));
        }

        schedules
    }

    /// Parse and group in one step.
    pub fn load<R: Read>(reader: R) -> Result<BTreeMap<String, Vec<TaxBracket>>, ScheduleLoaderError> {
        let records = Self::parse(reader)?;
        tracing::debug!(records = records.len(), "parsed schedule records");
        Ok(Self::group(&records))
    }
}
