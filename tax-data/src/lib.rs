//! CSV-backed tax schedules.

pub mod loader;
pub mod provider;

pub use loader::{ScheduleLoader, ScheduleLoaderError, ScheduleRecord};
pub use provider::{CsvProviderFactory, CsvScheduleProvider};
