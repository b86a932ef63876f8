use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tax_core::provider::{ProviderConfig, ProviderError, ProviderFactory, ScheduleProvider};
use tax_core::TaxBracket;

use crate::loader::{ScheduleLoader, ScheduleLoaderError};

/// A [`ScheduleProvider`] serving the schedules of one CSV file.
///
/// The file is read once when the provider is opened.
#[derive(Debug, Clone)]
pub struct CsvScheduleProvider {
    path: PathBuf,
    schedules: BTreeMap<String, Vec<TaxBracket>>,
}

impl CsvScheduleProvider {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, ScheduleLoaderError> {
        let path = path.as_ref().to_path_buf();
        let bytes = tokio::fs::read(&path).await?;
        let schedules = ScheduleLoader::load(bytes.as_slice())?;
        tracing::debug!(path = %path.display(), years = schedules.len(), "loaded schedule file");
        Ok(Self { path, schedules })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ScheduleProvider for CsvScheduleProvider {
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

/// [`ProviderFactory`] for CSV files.
///
/// `config.source` is the path of the file. A file that cannot be read is
/// reported as [`ProviderError::Unavailable`]; one that cannot be parsed as
/// [`ProviderError::Configuration`].
pub struct CsvProviderFactory;

#[async_trait]
impl ProviderFactory for CsvProviderFactory {
    fn backend_name(&self) -> &'static str {
        "csv"
    }

    async fn create(
        &self,
        config: &ProviderConfig,
    ) -> Result<Box<dyn ScheduleProvider>, ProviderError> {
        let provider = CsvScheduleProvider::open(&config.source)
            .await
            .map_err(|e| match e {
                ScheduleLoaderError::Io(reason) => {
                    ProviderError::Unavailable(format!("{}: {reason}", config.source))
                }
                ScheduleLoaderError::CsvParse(reason) => {
                    ProviderError::Configuration(format!("{}: {reason}", config.source))
                }
            })?;
        Ok(Box::new(provider))
    }
}
