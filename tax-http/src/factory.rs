use std::time::Duration;

use async_trait::async_trait;
use tax_core::provider::{ProviderConfig, ProviderError, ProviderFactory, ScheduleProvider};

use crate::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpScheduleProvider};

/// [`ProviderFactory`] for the HTTP API.
///
/// `config.source` is the base URL; when blank, [`DEFAULT_BASE_URL`] is used.
pub struct HttpProviderFactory;

#[async_trait]
impl ProviderFactory for HttpProviderFactory {
    fn backend_name(&self) -> &'static str {
        "http"
    }

    async fn create(
        &self,
        config: &ProviderConfig,
    ) -> Result<Box<dyn ScheduleProvider>, ProviderError> {
        let base_url = match config.source.trim() {
            "" => DEFAULT_BASE_URL,
            source => source,
        };
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ProviderError::Configuration(format!(
                "'{base_url}' is not an http(s) URL"
            )));
        }
        let timeout = config
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        tracing::debug!(base_url, ?timeout, "creating HTTP schedule provider");
        Ok(Box::new(HttpScheduleProvider::new(base_url, timeout)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(source: &str) -> ProviderConfig {
        ProviderConfig {
            backend: "http".to_string(),
            source: source.to_string(),
            timeout_secs: Some(3),
        }
    }

    #[tokio::test]
    async fn blank_source_uses_default_url() {
        let result = HttpProviderFactory.create(&config("  ")).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn non_http_source_is_configuration_error() {
        let result = HttpProviderFactory.create(&config("schedules.csv")).await;

        assert!(matches!(result, Err(ProviderError::Configuration(_))));
    }
}
