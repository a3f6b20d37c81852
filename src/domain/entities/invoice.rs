//! # Invoice Entity
//!
//! An invoice issued by a creditor to a debtor, payable at maturity.
//!
//! An invoice is financed at most once. Its two result amounts live in a
//! single optional [`FinancingAmounts`] pair, so they are either both absent
//! (pending) or both present and summing exactly to the face value (financed).
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use invoice_financing::domain::entities::{FinancingAmounts, Invoice};
//! use invoice_financing::domain::value_objects::{CreditorId, DebtorId, InvoiceId};
//!
//! let maturity = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
//! let mut invoice = Invoice::new(
//!     InvoiceId::new_v4(),
//!     CreditorId::new_v4(),
//!     DebtorId::new_v4(),
//!     maturity,
//!     1_000_000,
//! )
//! .unwrap();
//! assert!(invoice.is_pending());
//!
//! invoice.apply_financing(FinancingAmounts::split(1_000_000, 300).unwrap()).unwrap();
//! assert_eq!(invoice.early_payment_amount_in_cents(), Some(999_700));
//! assert_eq!(invoice.discounted_amount_in_cents(), Some(300));
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    CheckedArithmetic, CreditorId, DebtorId, FinancingStatus, InvoiceId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Early payment and discount of a financed invoice, in whole cents.
///
/// # Invariants
///
/// - both amounts are non-negative
/// - they add up to the face value they were split from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FinancingAmounts {
    early_payment_amount_in_cents: i64,
    discounted_amount_in_cents: i64,
}

impl FinancingAmounts {
    /// Splits a face value into early payment and discount.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmounts` unless `0 <= discount <= value`.
    pub fn split(value_in_cents: i64, discount_in_cents: i64) -> DomainResult<Self> {
        if discount_in_cents < 0 || discount_in_cents > value_in_cents {
            return Err(DomainError::invalid_amounts(format!(
                "discount {discount_in_cents} outside [0, {value_in_cents}]"
            )));
        }
        Ok(Self {
            early_payment_amount_in_cents: value_in_cents.safe_sub(discount_in_cents)?,
            discounted_amount_in_cents: discount_in_cents,
        })
    }

    /// Rebuilds the pair from two nullable columns.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmounts` if exactly one side is present,
    /// or if the two sides do not sum to `value_in_cents`.
    pub fn from_nullable(
        early_payment_amount_in_cents: Option<i64>,
        discounted_amount_in_cents: Option<i64>,
        value_in_cents: i64,
    ) -> DomainResult<Option<Self>> {
        match (early_payment_amount_in_cents, discounted_amount_in_cents) {
            (None, None) => Ok(None),
            (Some(early), Some(discount)) => {
                let amounts = Self::split(value_in_cents, discount)?;
                if amounts.early_payment_amount_in_cents != early {
                    return Err(DomainError::invalid_amounts(format!(
                        "{early} + {discount} != {value_in_cents}"
                    )));
                }
                Ok(Some(amounts))
            }
            _ => Err(DomainError::invalid_amounts(
                "early payment and discount must be both set or both null",
            )),
        }
    }

    /// Returns the cash paid to the creditor now.
    #[inline]
    #[must_use]
    pub fn early_payment_amount_in_cents(&self) -> i64 {
        self.early_payment_amount_in_cents
    }

    /// Returns the purchaser's interest.
    #[inline]
    #[must_use]
    pub fn discounted_amount_in_cents(&self) -> i64 {
        self.discounted_amount_in_cents
    }
}

/// A receivable owed by a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    id: InvoiceId,
    creditor_id: CreditorId,
    debtor_id: DebtorId,
    maturity_date: NaiveDate,
    value_in_cents: i64,
    financing: Option<FinancingAmounts>,
    /// Optimistic concurrency version, bumped on every update.
    version: u64,
}

impl Invoice {
    /// Creates a new pending invoice.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidInvoiceValue` if the value is not positive.
    pub fn new(
        id: InvoiceId,
        creditor_id: CreditorId,
        debtor_id: DebtorId,
        maturity_date: NaiveDate,
        value_in_cents: i64,
    ) -> DomainResult<Self> {
        if value_in_cents <= 0 {
            return Err(DomainError::InvalidInvoiceValue(value_in_cents));
        }
        Ok(Self {
            id,
            creditor_id,
            debtor_id,
            maturity_date,
            value_in_cents,
            financing: None,
            version: 0,
        })
    }

    /// Creates an invoice without validation (for reconstruction from storage).
    #[must_use]
    pub fn from_parts(
        id: InvoiceId,
        creditor_id: CreditorId,
        debtor_id: DebtorId,
        maturity_date: NaiveDate,
        value_in_cents: i64,
        financing: Option<FinancingAmounts>,
        version: u64,
    ) -> Self {
        Self {
            id,
            creditor_id,
            debtor_id,
            maturity_date,
            value_in_cents,
            financing,
            version,
        }
    }

    /// Records the financing outcome.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadyFinanced` if the invoice already carries
    /// amounts, or `DomainError::InvalidAmounts` if `amounts` were split from
    /// a different face value.
    pub fn apply_financing(&mut self, amounts: FinancingAmounts) -> DomainResult<()> {
        if self.financing.is_some() {
            return Err(DomainError::AlreadyFinanced(self.id));
        }
        let total = amounts
            .early_payment_amount_in_cents()
            .safe_add(amounts.discounted_amount_in_cents())?;
        if total != self.value_in_cents {
            return Err(DomainError::invalid_amounts(format!(
                "amounts total {total} but invoice {} is worth {}",
                self.id, self.value_in_cents
            )));
        }
        self.financing = Some(amounts);
        Ok(())
    }

    /// Returns a copy with the given version (used by stores after a write).
    #[must_use]
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Returns the invoice ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> InvoiceId {
        self.id
    }

    /// Returns the issuing creditor.
    #[inline]
    #[must_use]
    pub fn creditor_id(&self) -> CreditorId {
        self.creditor_id
    }

    /// Returns the paying debtor.
    #[inline]
    #[must_use]
    pub fn debtor_id(&self) -> DebtorId {
        self.debtor_id
    }

    /// Returns the date the debtor pays.
    #[inline]
    #[must_use]
    pub fn maturity_date(&self) -> NaiveDate {
        self.maturity_date
    }

    /// Returns the face value in cents.
    #[inline]
    #[must_use]
    pub fn value_in_cents(&self) -> i64 {
        self.value_in_cents
    }

    /// Returns the financing amounts, if financed.
    #[inline]
    #[must_use]
    pub fn financing(&self) -> Option<FinancingAmounts> {
        self.financing
    }

    /// Returns the early payment amount, if financed.
    #[must_use]
    pub fn early_payment_amount_in_cents(&self) -> Option<i64> {
        self.financing
            .map(|a| a.early_payment_amount_in_cents())
    }

    /// Returns the discount amount, if financed.
    #[must_use]
    pub fn discounted_amount_in_cents(&self) -> Option<i64> {
        self.financing.map(|a| a.discounted_amount_in_cents())
    }

    /// Returns the optimistic concurrency version.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the financing status.
    #[must_use]
    pub fn status(&self) -> FinancingStatus {
        if self.financing.is_some() {
            FinancingStatus::Financed
        } else {
            FinancingStatus::Pending
        }
    }

    /// Returns true if the invoice has not been financed.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status().is_pending()
    }
}

impl fmt::Display for Invoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invoice({}, value={}c, maturity={}, {})",
            self.id,
            self.value_in_cents,
            self.maturity_date,
            self.status()
        )
    }
}
