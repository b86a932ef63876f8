//! Calculation orchestration: input checks, schedule retrieval and the
//! per-request state machine.

pub mod calculator;
pub mod session;

pub use calculator::{CalculationError, TaxCalculator, parse_inputs};
pub use session::{CalculationSession, CalculationState};
