//! # Creditor Entity
//!
//! A creditor shipped goods to a debtor, issued an invoice for them, and is
//! waiting to be paid. It may accept early payment from a purchaser as long
//! as the financing rate stays within its tolerance.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::CreditorId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The issuer of an invoice.
///
/// # Examples
///
/// ```
/// use invoice_financing::domain::entities::Creditor;
/// use invoice_financing::domain::value_objects::CreditorId;
///
/// let creditor = Creditor::new(CreditorId::new_v4(), "Coffee Beans LLC", 5).unwrap();
/// assert_eq!(creditor.max_financing_rate_in_bps(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creditor {
    id: CreditorId,
    name: String,
    /// Most expensive term rate, in bps, the creditor tolerates.
    max_financing_rate_in_bps: i32,
}

impl Creditor {
    /// Creates a new creditor.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidName` if `name` is blank.
    pub fn new(
        id: CreditorId,
        name: impl Into<String>,
        max_financing_rate_in_bps: i32,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::invalid_name("creditor name must not be empty"));
        }
        Ok(Self {
            id,
            name,
            max_financing_rate_in_bps,
        })
    }

    /// Creates a creditor without validation (for reconstruction from storage).
    #[must_use]
    pub fn from_parts(id: CreditorId, name: String, max_financing_rate_in_bps: i32) -> Self {
        Self {
            id,
            name,
            max_financing_rate_in_bps,
        }
    }

    /// Returns the creditor ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> CreditorId {
        self.id
    }

    /// Returns the creditor name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the maximum acceptable financing rate in bps.
    #[inline]
    #[must_use]
    pub fn max_financing_rate_in_bps(&self) -> i32 {
        self.max_financing_rate_in_bps
    }
}

impl fmt::Display for Creditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Creditor({}, max_rate={}bps)",
            self.name, self.max_financing_rate_in_bps
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_blank_name() {
        let result = Creditor::new(CreditorId::new_v4(), "  ", 3);
        assert!(matches!(result, Err(DomainError::InvalidName(_))));
    }

    #[test]
    fn accessors() {
        let id = CreditorId::new_v4();
        let creditor = Creditor::new(id, "Home Brew", 7).unwrap();
        assert_eq!(creditor.id(), id);
        assert_eq!(creditor.name(), "Home Brew");
        assert_eq!(creditor.max_financing_rate_in_bps(), 7);
        assert!(creditor.to_string().contains("Home Brew"));
    }
}
