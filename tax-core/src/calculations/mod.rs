//! Marginal bracket tax calculations.
//!
//! The engine is a pure function of an income and a bracket schedule; it
//! holds no state and performs no I/O.

pub mod common;
pub mod marginal;

pub use marginal::{MarginalTaxCalculator, compute};
