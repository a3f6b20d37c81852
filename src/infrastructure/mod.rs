//! # Infrastructure Layer
//!
//! Adapters to the outside world: persistence, configuration, logging
//! setup and demo data.

pub mod config;
pub mod persistence;
pub mod seed;
pub mod telemetry;

pub use config::{ConfigError, FinancingConfig, LogFormat};
pub use telemetry::init_tracing;
