//! # Domain Errors
//!
//! Business rule violations raised by entities and domain services.
//!
//! An ineligible purchaser is *not* an error: eligibility checks report
//! rejections as values. The variants here describe states that must never
//! be reached by correct callers, or inputs that cannot form a valid entity.

use crate::domain::value_objects::{ArithmeticError, CreditorId, InvoiceId, PurchaserId};
use thiserror::Error;

/// Error type for domain rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// An entity name was empty.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// An invoice face value was not positive.
    #[error("invalid invoice value: {0} cents")]
    InvalidInvoiceValue(i64),

    /// A minimum financing term was negative.
    #[error("invalid minimum financing term: {0} days")]
    InvalidMinimumTerm(i64),

    /// A purchaser was configured twice for the same creditor.
    #[error("purchaser {purchaser} has more than one settings entry for creditor {creditor}")]
    DuplicateSettings {
        /// The purchaser.
        purchaser: PurchaserId,
        /// The creditor configured twice.
        creditor: CreditorId,
    },

    /// A financing result was requested for a purchaser without settings
    /// for the invoice's creditor.
    #[error("purchaser {purchaser} has no financing settings for creditor {creditor}")]
    MissingFinancingSettings {
        /// The purchaser.
        purchaser: PurchaserId,
        /// The creditor.
        creditor: CreditorId,
    },

    /// Financing amounts do not add up to the face value.
    #[error("invalid financing amounts: {0}")]
    InvalidAmounts(String),

    /// Financing was applied to an invoice that is already financed.
    #[error("invoice {0} is already financed")]
    AlreadyFinanced(InvoiceId),

    /// Arithmetic failure.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

impl DomainError {
    /// Creates an invalid name error.
    #[must_use]
    pub fn invalid_name(message: impl Into<String>) -> Self {
        Self::InvalidName(message.into())
    }

    /// Creates an invalid amounts error.
    #[must_use]
    pub fn invalid_amounts(message: impl Into<String>) -> Self {
        Self::InvalidAmounts(message.into())
    }

    /// Returns true if this error signals a broken internal contract
    /// rather than bad input data.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::MissingFinancingSettings { .. } | Self::AlreadyFinanced(_)
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_settings_is_contract_violation() {
        let err = DomainError::MissingFinancingSettings {
            purchaser: PurchaserId::new_v4(),
            creditor: CreditorId::new_v4(),
        };
        assert!(err.is_contract_violation());
        assert!(err.to_string().contains("no financing settings"));
    }

    #[test]
    fn already_financed_is_contract_violation() {
        let id = InvoiceId::new_v4();
        let err = DomainError::AlreadyFinanced(id);
        assert!(err.is_contract_violation());
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn input_errors_are_not_contract_violations() {
        assert!(!DomainError::InvalidInvoiceValue(-1).is_contract_violation());
        assert!(!DomainError::invalid_name("empty").is_contract_violation());
    }

    #[test]
    fn from_arithmetic_error() {
        let err: DomainError = ArithmeticError::Overflow.into();
        assert!(err.to_string().contains("overflow"));
    }
}
