//! # Application Services
//!
//! Services that orchestrate domain logic and persistence.
//!
//! This module provides application-level services including:
//! - [`InvoiceFinancingService`]: Runs a full financing pass
//! - [`PurchaserSelectionService`]: Picks the winning purchaser for an invoice
//! - [`SelectionStrategy`]: Strategies for choosing among eligible purchasers
//! - [`FinancingApplier`]: Persists one financing decision
//! - [`InvoiceBatchProcessor`]: Flush/clear cadence of a run
//! - [`FinancingReportService`]: Per-run purchaser/creditor totals

pub mod batch_processor;
pub mod financing_applier;
pub mod financing_report;
pub mod invoice_financing;
pub mod purchaser_selection;

pub use batch_processor::{DEFAULT_BATCH_SIZE, InvoiceBatchProcessor};
pub use financing_applier::FinancingApplier;
pub use financing_report::{FinancingReport, FinancingReportLine, FinancingReportService};
pub use invoice_financing::{FinancingRunConfig, FinancingRunSummary, InvoiceFinancingService};
pub use purchaser_selection::{LowestRateStrategy, PurchaserSelectionService, SelectionStrategy};
