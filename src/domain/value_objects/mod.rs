//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`CreditorId`], [`DebtorId`], [`PurchaserId`], [`InvoiceId`]: UUID-based identifiers
//! - [`FinancingRunId`]: Identifier of one allocation run
//!
//! ## Arithmetic
//!
//! - [`ArithmeticError`]: Error type for arithmetic failures
//! - [`CheckedArithmetic`]: Trait for safe arithmetic operations
//! - [`round_half_up`]: Fixed-scale half-up rounding
//!
//! ## Domain Enums
//!
//! - `FinancingStatus`: Pending or Financed
//! - `RunPhase`: Phases of an allocation run

pub mod arithmetic;
pub mod enums;
pub mod ids;

pub use arithmetic::{
    round_half_up, to_whole_cents, ArithmeticError, ArithmeticResult, CheckedArithmetic,
    AMOUNT_SCALE, CALCULATION_SCALE,
};
pub use enums::{FinancingStatus, ParseEnumError, RunPhase};
pub use ids::{CreditorId, DebtorId, FinancingRunId, InvoiceId, PurchaserId};
