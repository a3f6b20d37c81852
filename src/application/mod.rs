//! # Application Layer
//!
//! Use-case services that run financing passes and build reports on top of
//! the domain and the persistence ports.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
