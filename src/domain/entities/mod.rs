//! # Domain Entities
//!
//! Aggregate roots and entities of the financing domain.
//!
//! ## Aggregates
//!
//! - [`Invoice`]: Receivable with its optional financing amounts
//! - [`Purchaser`]: Invoice buyer owning its per-creditor settings
//! - [`InvoiceFinancingDetails`]: Immutable record of one financing
//!
//! ## Entities
//!
//! - [`Creditor`]: Invoice issuer with a maximum tolerated rate
//! - [`Debtor`]: Invoice payer
//!
//! ## Transient Values
//!
//! - [`PurchaserFinancingResult`]: Candidate outcome for one purchaser/invoice pair

pub mod creditor;
pub mod debtor;
pub mod financing_details;
pub mod financing_result;
pub mod invoice;
pub mod purchaser;

pub use creditor::Creditor;
pub use debtor::Debtor;
pub use financing_details::InvoiceFinancingDetails;
pub use financing_result::PurchaserFinancingResult;
pub use invoice::{FinancingAmounts, Invoice};
pub use purchaser::{Purchaser, PurchaserFinancingSettings};
