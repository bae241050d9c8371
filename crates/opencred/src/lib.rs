//! Client library for the OpenCred digital lending service: application intake, status
//! tracking, the intake assistant, and the manager review desk.

pub mod config;
pub mod error;
pub mod lending;
pub mod telemetry;

pub use config::{AppConfig, AppEnvironment, ConfigError};
pub use error::AppError;
