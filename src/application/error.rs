//! # Application Errors
//!
//! Error types for the application layer.
//!
//! A financing run either completes or fails as a whole; every variant here
//! aborts the run and rolls back its transaction. Purchasers that cannot
//! finance an invoice are not errors and never reach this type.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)           - Business rule or contract violations
//! ├── Repository(RepositoryError)   - Persistence failures
//! ├── CreditorNotFound              - Invoice references an unknown creditor
//! └── Configuration(String)         - Invalid service settings
//! ```
//!
//! # Examples
//!
//! ```
//! use invoice_financing::application::error::ApplicationError;
//! use invoice_financing::infrastructure::persistence::RepositoryError;
//!
//! let err: ApplicationError = RepositoryError::connection("reset by peer").into();
//! assert!(err.is_retryable());
//!
//! let err = ApplicationError::configuration("batch size must be positive");
//! assert!(!err.is_retryable());
//! ```

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{CreditorId, InvoiceId};
use crate::infrastructure::persistence::RepositoryError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain error from business logic.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Persistence error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// An invoice references a creditor that was not loaded.
    #[error("invoice {invoice} references unknown creditor {creditor}")]
    CreditorNotFound {
        /// The invoice.
        invoice: InvoiceId,
        /// The missing creditor.
        creditor: CreditorId,
    },

    /// Service configuration is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true if running again may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Repository(e) if e.is_transient())
    }

    /// Returns true if this error reveals a defect rather than bad luck.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_contract_violation(),
            Self::CreditorNotFound { .. } => true,
            Self::Repository(_) | Self::Configuration(_) => false,
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_errors_convert() {
        let err: ApplicationError = RepositoryError::query("bad sql").into();
        assert!(matches!(err, ApplicationError::Repository(_)));
        assert!(err.to_string().contains("bad sql"));
    }

    #[test]
    fn version_conflicts_are_retryable() {
        let err: ApplicationError =
            RepositoryError::version_conflict("Invoice", "inv-1", 0, 1).into();
        assert!(err.is_retryable());
        assert!(!err.is_contract_violation());
    }

    #[test]
    fn already_financed_is_contract_violation() {
        let err: ApplicationError = DomainError::AlreadyFinanced(InvoiceId::new_v4()).into();
        assert!(err.is_contract_violation());
        assert!(!err.is_retryable());
    }

    #[test]
    fn unknown_creditor_is_contract_violation() {
        let err = ApplicationError::CreditorNotFound {
            invoice: InvoiceId::new_v4(),
            creditor: CreditorId::new_v4(),
        };
        assert!(err.is_contract_violation());
        assert!(err.to_string().contains("unknown creditor"));
    }

    #[test]
    fn configuration_error() {
        let err = ApplicationError::configuration("batch size must be positive");
        assert!(err.to_string().contains("batch size"));
        assert!(!err.is_contract_violation());
    }
}
