pub mod calculations;
pub mod models;
pub mod orchestrator;
pub mod provider;

pub use calculations::{MarginalTaxCalculator, compute};
pub use models::*;
pub use orchestrator::{CalculationError, CalculationSession, CalculationState, TaxCalculator};
pub use provider::{ProviderConfig, ProviderError, ProviderRegistry, ScheduleProvider};
