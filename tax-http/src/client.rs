use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tax_core::{ProviderError, ScheduleProvider, TaxBracket};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Body of `GET /tax-calculator/tax-year/{year}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracketsResponse {
    pub tax_brackets: Vec<TaxBracket>,
}

/// Fetches schedules from a remote tax calculator API.
///
/// Each call issues one request; there is no caching and no retry.
#[derive(Debug, Clone)]
pub struct HttpScheduleProvider {
    base_url: Url,
    client: Client,
}

impl HttpScheduleProvider {
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, ProviderError> {
        let base_url = base_url.as_ref();
        let parsed = Url::parse(base_url)
            .map_err(|e| ProviderError::Configuration(format!("'{base_url}' is not a valid URL: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(ProviderError::Configuration(format!(
                "'{base_url}' cannot be used as a base URL"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ProviderError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            base_url: parsed,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Appends `segments` to the base path, percent-encoding each one so a
    /// segment can never add path levels or a query.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn schedule_url(&self, tax_year: &str) -> Url {
        self.endpoint(&["tax-calculator", "tax-year", tax_year])
    }

    fn index_url(&self) -> Url {
        self.endpoint(&["tax-calculator"])
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response, ProviderError> {
        tracing::debug!(url = %url, "GET");
        self.client.get(url.clone()).send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "request failed");
            ProviderError::Unavailable(describe_transport_error(&e))
        })
    }
}

#[async_trait]
impl ScheduleProvider for HttpScheduleProvider {
    async fn get_schedule(
        &self,
        tax_year: &str,
    ) -> Result<Vec<TaxBracket>, ProviderError> {
        let url = self.schedule_url(tax_year.trim());
        let response = self.get(url).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ProviderError::UnknownTaxYear(tax_year.to_string())),
            status if !status.is_success() => Err(unexpected_status(status, response).await),
            _ => {
                let body: TaxBracketsResponse = response.json().await.map_err(|e| {
                    ProviderError::Unavailable(format!("Malformed schedule response: {e}"))
                })?;
                Ok(body.tax_brackets)
            }
        }
    }

    async fn available_years(&self) -> Result<Vec<String>, ProviderError> {
        let url = self.index_url();
        let response = self.get(url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(unexpected_status(status, response).await);
        }

        let body: BTreeMap<String, serde_json::Value> = response.json().await.map_err(|e| {
            ProviderError::Unavailable(format!("Malformed schedule index: {e}"))
        })?;
        Ok(body.into_keys().collect())
    }
}

async fn unexpected_status(status: StatusCode, response: reqwest::Response) -> ProviderError {
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(%status, "schedule request rejected");
    if body.is_empty() {
        ProviderError::Unavailable(format!("HTTP {status}"))
    } else {
        ProviderError::Unavailable(format!("HTTP {status}: {body}"))
    }
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("could not connect: {err}")
    } else {
        err.to_string()
    }
}
