//! # Invoice Financing
//!
//! Allocates pending invoices to purchasers that pay the creditor early in
//! exchange for a discount.
//!
//! For every pending invoice a run computes the financing term and, for
//! each purchaser with settings for the invoice's creditor, the financing
//! rate over that term. Purchasers whose minimum term is not met, or whose
//! rate exceeds the creditor's cap, are skipped. The cheapest remaining
//! purchaser wins: the invoice is split into an early payment and a
//! discount, and an immutable financing record is written.
//!
//! ## Architecture
//!
//! - [`domain`]: Entities, value objects and the rate/eligibility rules
//! - [`application`]: Financing runs, purchaser selection and reports
//! - [`infrastructure`]: In-memory and PostgreSQL stores, configuration,
//!   tracing setup and demo seeding
//!
//! ## Example
//!
//! ```no_run
//! use invoice_financing::application::services::InvoiceFinancingService;
//! use invoice_financing::infrastructure::persistence::InMemoryFinancingStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryFinancingStore::new());
//! let summary = InvoiceFinancingService::with_defaults(store).run().await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
