//! Schedule provider backed by the tax calculator HTTP API.

pub mod client;
pub mod factory;

pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpScheduleProvider, TaxBracketsResponse};
pub use factory::HttpProviderFactory;
