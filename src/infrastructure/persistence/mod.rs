//! # Persistence Layer
//!
//! Repository ports and their adapters.
//!
//! ## Repository Traits (Ports)
//!
//! - [`CreditorRepository`]: Creditors
//! - [`DebtorRepository`]: Debtors
//! - [`PurchaserRepository`]: Purchasers with settings
//! - [`InvoiceRepository`]: Invoices with optimistic updates
//! - [`FinancingDetailsRepository`]: Financing records
//! - [`UnitOfWork`]: Run-wide transaction with flush/clear
//!
//! ## Implementations
//!
//! - `in_memory`: In-memory store for tests and the demo
//! - `postgres`: PostgreSQL store

pub mod in_memory;
pub mod postgres;
pub mod traits;

pub use in_memory::{InMemoryFinancingStore, StoreStats};
pub use postgres::PostgresFinancingStore;
pub use traits::{
    CreditorRepository, DebtorRepository, FinancingDetailsRepository, FinancingStore,
    InvoiceRepository, PurchaserRepository, RepositoryError, RepositoryResult, UnitOfWork,
};
