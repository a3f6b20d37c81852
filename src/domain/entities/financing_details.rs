//! # Invoice Financing Details
//!
//! Immutable record of how an invoice was financed. One-to-one with a
//! financed invoice: the record exists exactly when the invoice carries
//! amounts.

use crate::domain::entities::financing_result::PurchaserFinancingResult;
use crate::domain::entities::invoice::Invoice;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{CreditorId, FinancingRunId, InvoiceId, PurchaserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Financing record written alongside the invoice update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceFinancingDetails {
    invoice_id: InvoiceId,
    creditor_id: CreditorId,
    purchaser_id: PurchaserId,
    run_id: FinancingRunId,
    financing_date: NaiveDate,
    financing_term_in_days: i64,
    financing_rate_in_bps: i32,
    early_payment_amount_in_cents: i64,
    discounted_amount_in_cents: i64,
}

impl InvoiceFinancingDetails {
    /// Builds the record for a financed invoice and its winning result.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmounts` if the invoice has not been
    /// financed yet.
    pub fn record(
        run_id: FinancingRunId,
        invoice: &Invoice,
        winner: &PurchaserFinancingResult,
    ) -> DomainResult<Self> {
        let amounts = invoice.financing().ok_or_else(|| {
            DomainError::invalid_amounts(format!(
                "invoice {} has no financing amounts to record",
                invoice.id()
            ))
        })?;
        Ok(Self {
            invoice_id: invoice.id(),
            creditor_id: invoice.creditor_id(),
            purchaser_id: winner.purchaser_id,
            run_id,
            financing_date: winner.financing_date,
            financing_term_in_days: winner.financing_term_in_days,
            financing_rate_in_bps: winner.financing_rate_in_bps,
            early_payment_amount_in_cents: amounts.early_payment_amount_in_cents(),
            discounted_amount_in_cents: amounts.discounted_amount_in_cents(),
        })
    }

    /// Creates a record without validation (for reconstruction from storage).
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn from_parts(
        invoice_id: InvoiceId,
        creditor_id: CreditorId,
        purchaser_id: PurchaserId,
        run_id: FinancingRunId,
        financing_date: NaiveDate,
        financing_term_in_days: i64,
        financing_rate_in_bps: i32,
        early_payment_amount_in_cents: i64,
        discounted_amount_in_cents: i64,
    ) -> Self {
        Self {
            invoice_id,
            creditor_id,
            purchaser_id,
            run_id,
            financing_date,
            financing_term_in_days,
            financing_rate_in_bps,
            early_payment_amount_in_cents,
            discounted_amount_in_cents,
        }
    }

    /// Returns the financed invoice.
    #[inline]
    #[must_use]
    pub fn invoice_id(&self) -> InvoiceId {
        self.invoice_id
    }

    /// Returns the invoice's creditor.
    #[inline]
    #[must_use]
    pub fn creditor_id(&self) -> CreditorId {
        self.creditor_id
    }

    /// Returns the winning purchaser.
    #[inline]
    #[must_use]
    pub fn purchaser_id(&self) -> PurchaserId {
        self.purchaser_id
    }

    /// Returns the run that created this record.
    #[inline]
    #[must_use]
    pub fn run_id(&self) -> FinancingRunId {
        self.run_id
    }

    /// Returns the financing date.
    #[inline]
    #[must_use]
    pub fn financing_date(&self) -> NaiveDate {
        self.financing_date
    }

    /// Returns the financing term in days.
    #[inline]
    #[must_use]
    pub fn financing_term_in_days(&self) -> i64 {
        self.financing_term_in_days
    }

    /// Returns the applied rate in bps.
    #[inline]
    #[must_use]
    pub fn financing_rate_in_bps(&self) -> i32 {
        self.financing_rate_in_bps
    }

    /// Returns the early payment amount in cents.
    #[inline]
    #[must_use]
    pub fn early_payment_amount_in_cents(&self) -> i64 {
        self.early_payment_amount_in_cents
    }

    /// Returns the discount amount in cents.
    #[inline]
    #[must_use]
    pub fn discounted_amount_in_cents(&self) -> i64 {
        self.discounted_amount_in_cents
    }
}

impl fmt::Display for InvoiceFinancingDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FinancingDetails(invoice={}, purchaser={}, rate={}bps, early={}c, discount={}c)",
            self.invoice_id,
            self.purchaser_id,
            self.financing_rate_in_bps,
            self.early_payment_amount_in_cents,
            self.discounted_amount_in_cents
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::invoice::FinancingAmounts;
    use crate::domain::value_objects::DebtorId;
    use rust_decimal_macros::dec;

    fn invoice() -> Invoice {
        Invoice::new(
            InvoiceId::new_v4(),
            CreditorId::new_v4(),
            DebtorId::new_v4(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            1_000_000,
        )
        .unwrap()
    }

    fn winner() -> PurchaserFinancingResult {
        PurchaserFinancingResult {
            purchaser_id: PurchaserId::new_v4(),
            financing_rate_in_bps: 3,
            exact_financing_rate: dec!(3.3333333333),
            financing_term_in_days: 30,
            financing_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn record_requires_financed_invoice() {
        let result = InvoiceFinancingDetails::record(FinancingRunId::new_v4(), &invoice(), &winner());
        assert!(matches!(result, Err(DomainError::InvalidAmounts(_))));
    }

    #[test]
    fn record_copies_amounts_and_winner() {
        let mut invoice = invoice();
        invoice
            .apply_financing(FinancingAmounts::split(1_000_000, 300).unwrap())
            .unwrap();
        let winner = winner();
        let run = FinancingRunId::new_v4();

        let details = InvoiceFinancingDetails::record(run, &invoice, &winner).unwrap();

        assert_eq!(details.invoice_id(), invoice.id());
        assert_eq!(details.creditor_id(), invoice.creditor_id());
        assert_eq!(details.purchaser_id(), winner.purchaser_id);
        assert_eq!(details.run_id(), run);
        assert_eq!(details.financing_term_in_days(), 30);
        assert_eq!(details.financing_rate_in_bps(), 3);
        assert_eq!(details.early_payment_amount_in_cents(), 999_700);
        assert_eq!(details.discounted_amount_in_cents(), 300);
    }
}
