//! # Debtor Entity
//!
//! The party obliged to pay an invoice at maturity. The allocation logic
//! never looks at it beyond the invoice's foreign key.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::DebtorId;
use serde::{Deserialize, Serialize};

/// The payer of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debtor {
    id: DebtorId,
    name: String,
}

impl Debtor {
    /// Creates a new debtor.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidName` if `name` is blank.
    pub fn new(id: DebtorId, name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::invalid_name("debtor name must not be empty"));
        }
        Ok(Self { id, name })
    }

    /// Creates a debtor without validation (for reconstruction from storage).
    #[must_use]
    pub fn from_parts(id: DebtorId, name: String) -> Self {
        Self { id, name }
    }

    /// Returns the debtor ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> DebtorId {
        self.id
    }

    /// Returns the debtor name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
