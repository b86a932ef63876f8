pub mod app;
pub mod config;
pub mod display;
pub mod interactive;
pub mod logging;
pub mod utils;
