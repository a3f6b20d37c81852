//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! The financing run talks to storage only through these traits, so the
//! same orchestration drives the in-memory store in tests and PostgreSQL in
//! production.
//!
//! # Available Repositories
//!
//! - [`CreditorRepository`]: Creditors and their rate caps
//! - [`DebtorRepository`]: Debtors
//! - [`PurchaserRepository`]: Purchasers with their per-creditor settings
//! - [`InvoiceRepository`]: Invoices, pending lookup, optimistic updates
//! - [`FinancingDetailsRepository`]: Financing records
//! - [`UnitOfWork`]: Transaction boundary with flush/clear
//!
//! [`FinancingStore`] bundles all of them for services that need the lot.
//!
//! # Examples
//!
//! ```ignore
//! use invoice_financing::infrastructure::persistence::traits::InvoiceRepository;
//!
//! async fn pending(repo: &impl InvoiceRepository) {
//!     let pending = repo.find_pending().await.unwrap();
//!     println!("{} invoices awaiting financing", pending.len());
//! }
//! ```

use crate::domain::entities::{Creditor, Debtor, Invoice, InvoiceFinancingDetails, Purchaser};
use crate::domain::value_objects::{
    CreditorId, DebtorId, FinancingRunId, InvoiceId, PurchaserId,
};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Duplicate entity.
    #[error("Duplicate entity: {entity_type} with id {id} already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Optimistic locking conflict.
    #[error("Version conflict: {entity_type} with id {id} has been modified")]
    VersionConflict {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
        /// Expected version.
        expected: u64,
        /// Actual version.
        actual: u64,
    },

    /// Transaction misuse (begin twice, commit without begin).
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query error.
    #[error("Query error: {0}")]
    Query(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, id: impl fmt::Display) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Creates a version conflict error.
    #[must_use]
    pub fn version_conflict(
        entity_type: &'static str,
        id: impl fmt::Display,
        expected: u64,
        actual: u64,
    ) -> Self {
        Self::VersionConflict {
            entity_type,
            id: id.to_string(),
            expected,
            actual,
        }
    }

    /// Creates a transaction error.
    #[must_use]
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::Transaction(msg.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a duplicate error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Returns true if this is a version conflict error.
    #[must_use]
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }

    /// Returns true if retrying the whole run may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::VersionConflict { .. } | Self::Connection(_))
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository for creditors.
#[async_trait]
pub trait CreditorRepository: Send + Sync + fmt::Debug {
    /// Saves a creditor, replacing any existing one with the same ID.
    async fn save_creditor(&self, creditor: &Creditor) -> RepositoryResult<()>;

    /// Gets a creditor by ID.
    ///
    /// Returns `None` if the creditor does not exist.
    async fn get_creditor(&self, id: &CreditorId) -> RepositoryResult<Option<Creditor>>;

    /// Gets all creditors.
    async fn find_all_creditors(&self) -> RepositoryResult<Vec<Creditor>>;
}

/// Repository for debtors.
#[async_trait]
pub trait DebtorRepository: Send + Sync + fmt::Debug {
    /// Saves a debtor, replacing any existing one with the same ID.
    async fn save_debtor(&self, debtor: &Debtor) -> RepositoryResult<()>;

    /// Gets a debtor by ID.
    ///
    /// Returns `None` if the debtor does not exist.
    async fn get_debtor(&self, id: &DebtorId) -> RepositoryResult<Option<Debtor>>;
}

/// Repository for purchasers.
///
/// Purchasers are always read and written together with their settings.
#[async_trait]
pub trait PurchaserRepository: Send + Sync + fmt::Debug {
    /// Saves a purchaser and replaces its settings.
    async fn save_purchaser(&self, purchaser: &Purchaser) -> RepositoryResult<()>;

    /// Gets a purchaser by ID, with settings.
    async fn get_purchaser(&self, id: &PurchaserId) -> RepositoryResult<Option<Purchaser>>;

    /// Loads every purchaser with its full settings collection in one call.
    async fn find_all_with_settings(&self) -> RepositoryResult<Vec<Purchaser>>;
}

/// Repository for invoices.
///
/// # Examples
///
/// ```ignore
/// use invoice_financing::infrastructure::persistence::traits::InvoiceRepository;
///
/// async fn example(repo: &impl InvoiceRepository, mut invoice: Invoice) {
///     invoice.apply_financing(amounts)?;
///     let saved = repo.save_invoice(&invoice).await?;
///     assert_eq!(saved.version(), invoice.version() + 1);
/// }
/// ```
#[async_trait]
pub trait InvoiceRepository: Send + Sync + fmt::Debug {
    /// Inserts a new invoice.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the ID already exists.
    async fn insert_invoice(&self, invoice: &Invoice) -> RepositoryResult<()>;

    /// Updates an invoice's financing fields.
    ///
    /// Uses optimistic locking: the stored version must equal
    /// `invoice.version()`. Returns the persisted invoice with its version
    /// incremented.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::VersionConflict` if the invoice has been
    /// modified since it was loaded, or `RepositoryError::NotFound` if it
    /// does not exist.
    async fn save_invoice(&self, invoice: &Invoice) -> RepositoryResult<Invoice>;

    /// Gets an invoice by ID.
    ///
    /// Returns `None` if the invoice does not exist.
    async fn get_invoice(&self, id: &InvoiceId) -> RepositoryResult<Option<Invoice>>;

    /// Finds all invoices without financing amounts.
    async fn find_pending(&self) -> RepositoryResult<Vec<Invoice>>;

    /// Counts invoices without financing amounts.
    async fn count_pending(&self) -> RepositoryResult<u64>;
}

/// Repository for financing records.
#[async_trait]
pub trait FinancingDetailsRepository: Send + Sync + fmt::Debug {
    /// Saves a new financing record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the invoice already has one.
    async fn save_details(
        &self,
        details: &InvoiceFinancingDetails,
    ) -> RepositoryResult<InvoiceFinancingDetails>;

    /// Gets the financing record of an invoice.
    async fn get_details(
        &self,
        invoice_id: &InvoiceId,
    ) -> RepositoryResult<Option<InvoiceFinancingDetails>>;

    /// Finds all records created by a financing run.
    async fn find_by_run(
        &self,
        run_id: &FinancingRunId,
    ) -> RepositoryResult<Vec<InvoiceFinancingDetails>>;
}

/// Transaction boundary for a financing run.
///
/// Writes made between [`begin`](UnitOfWork::begin) and
/// [`commit`](UnitOfWork::commit) are invisible to other readers and are
/// discarded by [`rollback`](UnitOfWork::rollback). Without an active
/// transaction, writes apply immediately.
#[async_trait]
pub trait UnitOfWork: Send + Sync + fmt::Debug {
    /// Opens the transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Transaction` if one is already open.
    async fn begin(&self) -> RepositoryResult<()>;

    /// Pushes buffered writes to the backing store without committing.
    async fn flush(&self) -> RepositoryResult<()>;

    /// Drops in-memory tracking of written entities. Unflushed writes are lost.
    async fn clear(&self) -> RepositoryResult<()>;

    /// Flushes and commits the transaction.
    async fn commit(&self) -> RepositoryResult<()>;

    /// Discards everything written since `begin`, flushed or not.
    async fn rollback(&self) -> RepositoryResult<()>;
}

/// Every port the financing services need, behind one object.
pub trait FinancingStore:
    CreditorRepository
    + DebtorRepository
    + PurchaserRepository
    + InvoiceRepository
    + FinancingDetailsRepository
    + UnitOfWork
{
}

impl<T> FinancingStore for T where
    T: CreditorRepository
        + DebtorRepository
        + PurchaserRepository
        + InvoiceRepository
        + FinancingDetailsRepository
        + UnitOfWork
{
}
