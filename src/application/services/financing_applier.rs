//! # Financing Applier
//!
//! Turns a winning purchaser into persisted state: the invoice's amounts
//! and its financing record.
//!
//! All domain checks run before the first write. The two writes then go
//! through the run's unit of work, so an error between them aborts the run
//! and the rollback removes both.

use crate::application::error::ApplicationResult;
use crate::domain::entities::{Invoice, InvoiceFinancingDetails, PurchaserFinancingResult};
use crate::domain::services::FinancingCalculator;
use crate::domain::value_objects::FinancingRunId;
use crate::infrastructure::persistence::traits::{FinancingDetailsRepository, InvoiceRepository};

/// Applies a financing decision to an invoice.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinancingApplier {
    calculator: FinancingCalculator,
}

impl FinancingApplier {
    /// Creates an applier.
    #[must_use]
    pub fn new(calculator: FinancingCalculator) -> Self {
        Self { calculator }
    }

    /// Finances `invoice` through `winner` and persists the outcome.
    ///
    /// Returns the saved financing record.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` if the invoice is already financed
    /// or the amounts cannot be computed, and `ApplicationError::Repository`
    /// if either write fails (including an optimistic version conflict).
    pub async fn apply<S>(
        &self,
        store: &S,
        run_id: FinancingRunId,
        invoice: Invoice,
        winner: &PurchaserFinancingResult,
    ) -> ApplicationResult<InvoiceFinancingDetails>
    where
        S: InvoiceRepository + FinancingDetailsRepository + ?Sized,
    {
        let amounts = self
            .calculator
            .financing_amounts(invoice.value_in_cents(), winner.financing_rate_in_bps)?;

        let mut financed = invoice;
        financed.apply_financing(amounts)?;
        let details = InvoiceFinancingDetails::record(run_id, &financed, winner)?;

        store.save_invoice(&financed).await?;
        let saved = store.save_details(&details).await?;

        tracing::debug!(
            invoice = %saved.invoice_id(),
            purchaser = %saved.purchaser_id(),
            financing_rate_in_bps = saved.financing_rate_in_bps(),
            early_payment_amount_in_cents = saved.early_payment_amount_in_cents(),
            discounted_amount_in_cents = saved.discounted_amount_in_cents(),
            "invoice financed"
        );
        Ok(saved)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::error::ApplicationError;
    use crate::domain::entities::FinancingAmounts;
    use crate::domain::errors::DomainError;
    use crate::domain::value_objects::{CreditorId, DebtorId, InvoiceId, PurchaserId};
    use crate::infrastructure::persistence::InMemoryFinancingStore;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn invoice() -> Invoice {
        Invoice::new(
            InvoiceId::new_v4(),
            CreditorId::new_v4(),
            DebtorId::new_v4(),
            NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
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
            financing_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn writes_invoice_and_details() {
        let store = InMemoryFinancingStore::new();
        let inv = invoice();
        store.insert_invoice(&inv).await.unwrap();
        let run = FinancingRunId::new_v4();

        let details = FinancingApplier::default()
            .apply(&store, run, inv.clone(), &winner())
            .await
            .unwrap();

        assert_eq!(details.discounted_amount_in_cents(), 300);
        assert_eq!(details.early_payment_amount_in_cents(), 999_700);
        assert_eq!(details.run_id(), run);

        let stored = store.get_invoice(&inv.id()).await.unwrap().unwrap();
        assert_eq!(stored.discounted_amount_in_cents(), Some(300));
        assert_eq!(stored.early_payment_amount_in_cents(), Some(999_700));
        assert_eq!(stored.version(), 1);
        assert!(store.get_details(&inv.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn refuses_financed_invoice_before_writing() {
        let store = InMemoryFinancingStore::new();
        let mut inv = invoice();
        inv.apply_financing(FinancingAmounts::split(1_000_000, 100).unwrap())
            .unwrap();
        store.insert_invoice(&inv).await.unwrap();

        let err = FinancingApplier::default()
            .apply(&store, FinancingRunId::new_v4(), inv.clone(), &winner())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::AlreadyFinanced(_))
        ));
        assert!(store.get_details(&inv.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stale_invoice_conflicts() {
        let store = InMemoryFinancingStore::new();
        let inv = invoice();
        store.insert_invoice(&inv).await.unwrap();
        let applier = FinancingApplier::default();

        applier
            .apply(&store, FinancingRunId::new_v4(), inv.clone(), &winner())
            .await
            .unwrap();
        let err = applier
            .apply(&store, FinancingRunId::new_v4(), inv, &winner())
            .await
            .unwrap_err();

        assert!(err.is_retryable());
    }
}
