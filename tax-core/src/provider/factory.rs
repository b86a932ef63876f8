use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::schedule_provider::{ProviderError, ScheduleProvider};

/// Where schedules come from.
///
/// `backend` picks a registered [`ProviderFactory`]; `source` is read by that
/// factory alone:
///
/// | backend  | source                                  |
/// |----------|-----------------------------------------|
/// | `memory` | `builtin` or `empty`                    |
/// | `csv`    | path to a `tax_year,min,max,rate` file  |
/// | `http`   | API base URL, `http://localhost:5001/`  |
///
/// Missing fields fall back to the built-in in-memory schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub backend: String,
    pub source: String,
    /// Per-request limit for backends that do I/O.
    pub timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            source: "builtin".to_string(),
            timeout_secs: None,
        }
    }
}

/// Opens a [`ScheduleProvider`] for one backend.
#[async_trait]
pub trait ProviderFactory: Send + Sync {
    /// Name matched against [`ProviderConfig::backend`].
    fn backend_name(&self) -> &'static str;

    async fn create(
        &self,
        config: &ProviderConfig,
    ) -> Result<Box<dyn ScheduleProvider>, ProviderError>;
}

/// Schedule backends known to the application, looked up by name.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: HashMap<&'static str, Box<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `factory`, replacing any backend of the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn ProviderFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Registered backend names in alphabetical order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Opens the schedule source named by `config`.
    ///
    /// # Errors
    ///
    /// [`ProviderError::Configuration`] for a backend nobody registered;
    /// otherwise whatever the backend's factory reports.
    pub async fn create(
        &self,
        config: &ProviderConfig,
    ) -> Result<Box<dyn ScheduleProvider>, ProviderError> {
        let Some(factory) = self.factories.get(config.backend.as_str()) else {
            return Err(ProviderError::Configuration(format!(
                "unknown schedule backend '{}' (available: {})",
                config.backend,
                self.available_backends().join(", ")
            )));
        };

        tracing::debug!(backend = %config.backend, source = %config.source, "opening schedule source");
        factory.create(config).await
    }
}
