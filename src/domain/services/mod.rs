//! # Domain Services
//!
//! Stateless financing logic that doesn't belong to a single entity.
//!
//! ## Services
//!
//! - [`FinancingCalculator`]: Term, rate, discount and early payment arithmetic
//! - [`EligibilityEvaluator`]: Purchaser eligibility rules
//! - [`PurchaserPool`]: Run-scoped purchaser snapshot with settings lookup

pub mod eligibility;
pub mod financing_calculator;
pub mod purchaser_pool;

pub use eligibility::{EligibilityEvaluator, Ineligibility};
pub use financing_calculator::{BPS_DIVISOR, DAYS_IN_FINANCIAL_YEAR, FinancingCalculator};
pub use purchaser_pool::PurchaserPool;
