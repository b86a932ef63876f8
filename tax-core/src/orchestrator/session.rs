//! Request lifecycle for an interactive calculator.
//!
//! ```text
//! Idle ──submit──▶ Validating ──▶ Error
//!                      │
//!                      ▼
//!                   Loading ──▶ Success | Error
//! ```
//!
//! Any state may be re-entered through a new submission. Only the most
//! recent submission may write its outcome: a request still loading when a
//! newer one arrives is superseded and its result is dropped.

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use super::calculator::{CalculationError, TaxCalculator, parse_inputs};
use crate::models::TaxResult;
use crate::provider::ScheduleProvider;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CalculationState {
    #[default]
    Idle,
    Validating {
        request_id: u64,
    },
    Loading {
        request_id: u64,
    },
    Success {
        request_id: u64,
        result: TaxResult,
    },
    Error {
        request_id: u64,
        error: CalculationError,
    },
}

impl CalculationState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Id of the request this state belongs to, `None` while idle.
    pub fn request_id(&self) -> Option<u64> {
        match self {
            Self::Idle => None,
            Self::Validating { request_id }
            | Self::Loading { request_id }
            | Self::Success { request_id, .. }
            | Self::Error { request_id, .. } => Some(*request_id),
        }
    }
}

#[derive(Debug, Default)]
struct SessionInner {
    state: CalculationState,
    latest_request: u64,
}

/// Orchestrator-local state wrapped around a [`TaxCalculator`].
///
/// The session is `Sync`; share it behind an `Arc` when submissions come
/// from several tasks.
#[derive(Debug)]
pub struct CalculationSession<P> {
    calculator: TaxCalculator<P>,
    inner: Mutex<SessionInner>,
}

impl<P: ScheduleProvider> CalculationSession<P> {
    pub fn new(provider: P) -> Self {
        Self {
            calculator: TaxCalculator::new(provider),
            inner: Mutex::new(SessionInner::default()),
        }
    }

    pub fn calculator(&self) -> &TaxCalculator<P> {
        &self.calculator
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> CalculationState {
        self.lock().state.clone()
    }

    pub fn reset(&self) {
        self.lock().state = CalculationState::Idle;
    }

    /// Runs one submission through the state machine.
    ///
    /// # Errors
    ///
    /// Every [`CalculationError`] of [`TaxCalculator::calculate`], plus
    /// [`CalculationError::Superseded`] when a newer submission started
    /// while this one was loading.
    pub async fn submit(
        &self,
        income: &str,
        tax_year: &str,
    ) -> Result<TaxResult, CalculationError> {
        let request_id = {
            let mut inner = self.lock();
            inner.latest_request += 1;
            let request_id = inner.latest_request;
            if inner.state.is_loading() {
                debug!(request_id, "new submission supersedes pending calculation");
            }
            inner.state = CalculationState::Validating { request_id };
            request_id
        };

        let income = match parse_inputs(income, tax_year) {
            Ok(income) => income,
            Err(err) => return self.finish(request_id, Err(err)),
        };

        {
            let mut inner = self.lock();
            if inner.latest_request != request_id {
                debug!(request_id, "superseded before loading");
                return Err(CalculationError::Superseded { request_id });
            }
            inner.state = CalculationState::Loading { request_id };
        }
        let outcome = self
            .calculator
            .calculate_for_year(income, tax_year.trim())
            .await;
        self.finish(request_id, outcome)
    }

    /// Records `outcome` if `request_id` is still the latest submission.
    fn finish(
        &self,
        request_id: u64,
        outcome: Result<TaxResult, CalculationError>,
    ) -> Result<TaxResult, CalculationError> {
        let mut inner = self.lock();
        if inner.latest_request != request_id {
            warn!(
                request_id,
                latest = inner.latest_request,
                "discarding superseded calculation"
            );
            return Err(CalculationError::Superseded { request_id });
        }

        inner.state = match &outcome {
            Ok(result) => CalculationState::Success {
                request_id,
                result: result.clone(),
            },
            Err(error) => CalculationState::Error {
                request_id,
                error: error.clone(),
            },
        };
        outcome
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
