pub mod factory;
pub mod memory;
pub mod schedule_provider;

pub use factory::{ProviderConfig, ProviderFactory, ProviderRegistry};
pub use memory::{InMemoryScheduleProvider, MemoryProviderFactory};
pub use schedule_provider::{ProviderError, ScheduleProvider};
