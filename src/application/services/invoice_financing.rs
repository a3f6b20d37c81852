//! # Invoice Financing Service
//!
//! Drives one financing run.
//!
//! A run moves through [`RunPhase`]s:
//!
//! 1. **Loading**: pending invoices, purchasers with settings, and creditors
//!    are read once.
//! 2. **Iterating**: every pending invoice gets the best purchaser; a match
//!    is applied immediately.
//! 3. **Flushing**: every `batch_size` financings the unit of work is
//!    flushed and cleared.
//! 4. **Done**: the transaction commits and a [`FinancingRunSummary`] is
//!    returned.
//!
//! Any error rolls the whole run back.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::batch_processor::{DEFAULT_BATCH_SIZE, InvoiceBatchProcessor};
use crate::application::services::financing_applier::FinancingApplier;
use crate::application::services::purchaser_selection::{
    LowestRateStrategy, PurchaserSelectionService, SelectionStrategy,
};
use crate::domain::entities::Creditor;
use crate::domain::services::{FinancingCalculator, PurchaserPool};
use crate::domain::value_objects::{CreditorId, FinancingRunId, RunPhase};
use crate::infrastructure::persistence::traits::FinancingStore;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Configuration for financing runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancingRunConfig {
    /// Financed invoices between flush/clear cycles.
    pub batch_size: usize,
}

impl Default for FinancingRunConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl FinancingRunConfig {
    /// Creates a configuration with the given batch size.
    #[must_use]
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self { batch_size }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancingRunSummary {
    /// Identifier stamped on every financing record of the run.
    pub run_id: FinancingRunId,
    /// Date used as "today".
    pub financing_date: NaiveDate,
    /// Pending invoices examined.
    pub examined: u64,
    /// Invoices financed.
    pub financed: u64,
    /// Flush/clear cycles performed.
    pub flushes: u64,
}

impl fmt::Display for FinancingRunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FinancingRun({}: financed {} of {} on {}, {} flushes)",
            self.run_id, self.financed, self.examined, self.financing_date, self.flushes
        )
    }
}

/// Orchestrates financing runs against a store.
#[derive(Debug)]
pub struct InvoiceFinancingService {
    store: Arc<dyn FinancingStore>,
    selection: PurchaserSelectionService,
    applier: FinancingApplier,
    config: FinancingRunConfig,
}

impl InvoiceFinancingService {
    /// Creates a new service.
    #[must_use]
    pub fn new(
        store: Arc<dyn FinancingStore>,
        strategy: Arc<dyn SelectionStrategy>,
        config: FinancingRunConfig,
    ) -> Self {
        Self {
            store,
            selection: PurchaserSelectionService::new(strategy),
            applier: FinancingApplier::new(FinancingCalculator::new()),
            config,
        }
    }

    /// Creates a service with the lowest-rate strategy and default batch size.
    #[must_use]
    pub fn with_defaults(store: Arc<dyn FinancingStore>) -> Self {
        Self::new(
            store,
            Arc::new(LowestRateStrategy::new()),
            FinancingRunConfig::default(),
        )
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &FinancingRunConfig {
        &self.config
    }

    /// Runs with today's UTC date as the financing date.
    ///
    /// # Errors
    ///
    /// See [`run_on`](Self::run_on).
    pub async fn run(&self) -> ApplicationResult<FinancingRunSummary> {
        self.run_on(Utc::now().date_naive()).await
    }

    /// Runs with an explicit financing date.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` for a zero batch size, and
    /// any domain or repository error raised mid-run. On error the run's
    /// transaction is rolled back.
    pub async fn run_on(&self, financing_date: NaiveDate) -> ApplicationResult<FinancingRunSummary> {
        let batch = InvoiceBatchProcessor::new(self.config.batch_size)?;
        let run_id = FinancingRunId::new_v4();

        tracing::info!(
            %run_id,
            %financing_date,
            batch_size = batch.batch_size(),
            strategy = self.selection.strategy_name(),
            "starting financing run"
        );

        self.store.begin().await?;
        match self.execute(run_id, financing_date, batch).await {
            Ok(summary) => {
                self.store.commit().await?;
                tracing::info!(
                    %run_id,
                    phase = %RunPhase::Done,
                    examined = summary.examined,
                    financed = summary.financed,
                    flushes = summary.flushes,
                    "financing run committed"
                );
                Ok(summary)
            }
            Err(err) => {
                tracing::error!(%run_id, error = %err, "financing run failed, rolling back");
                if let Err(rollback) = self.store.rollback().await {
                    tracing::error!(%run_id, error = %rollback, "rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn execute(
        &self,
        run_id: FinancingRunId,
        financing_date: NaiveDate,
        mut batch: InvoiceBatchProcessor,
    ) -> ApplicationResult<FinancingRunSummary> {
        tracing::info!(%run_id, phase = %RunPhase::Loading, "loading financing candidates");
        let pending = self.store.find_pending().await?;
        let pool = PurchaserPool::new(self.store.find_all_with_settings().await?);
        let creditors: HashMap<CreditorId, Creditor> = self
            .store
            .find_all_creditors()
            .await?
            .into_iter()
            .map(|c| (c.id(), c))
            .collect();

        let examined = pending.len() as u64;
        tracing::info!(
            %run_id,
            phase = %RunPhase::Iterating,
            pending = examined,
            purchasers = pool.len(),
            creditors = creditors.len(),
            "evaluating pending invoices"
        );

        for invoice in pending {
            let creditor = creditors.get(&invoice.creditor_id()).ok_or(
                ApplicationError::CreditorNotFound {
                    invoice: invoice.id(),
                    creditor: invoice.creditor_id(),
                },
            )?;

            let Some(winner) =
                self.selection
                    .find_best_purchaser(&invoice, creditor, &pool, financing_date)
            else {
                tracing::debug!(invoice = %invoice.id(), "no eligible purchaser");
                continue;
            };

            self.applier
                .apply(self.store.as_ref(), run_id, invoice, &winner)
                .await?;
            if batch.record_financed(self.store.as_ref()).await? {
                tracing::debug!(%run_id, phase = %RunPhase::Flushing, "batch boundary reached");
            }
        }

        Ok(FinancingRunSummary {
            run_id,
            financing_date,
            examined,
            financed: batch.financed(),
            flushes: batch.flushes(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::{Invoice, Purchaser, PurchaserFinancingSettings};
    use crate::domain::value_objects::{DebtorId, InvoiceId, PurchaserId};
    use crate::infrastructure::persistence::InMemoryFinancingStore;
    use crate::infrastructure::persistence::traits::{
        CreditorRepository, InvoiceRepository, PurchaserRepository,
    };

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    async fn seeded(cap: i32, invoices: usize) -> (InMemoryFinancingStore, Creditor) {
        let store = InMemoryFinancingStore::new();
        let creditor = Creditor::new(CreditorId::new_v4(), "Coffee Beans LLC", cap).unwrap();
        store.save_creditor(&creditor).await.unwrap();
        let purchaser = Purchaser::new(PurchaserId::new_v4(), "FatBank", 10)
            .unwrap()
            .with_settings(PurchaserFinancingSettings::new(creditor.id(), 40))
            .unwrap();
        store.save_purchaser(&purchaser).await.unwrap();
        for _ in 0..invoices {
            let invoice = Invoice::new(
                InvoiceId::new_v4(),
                creditor.id(),
                DebtorId::new_v4(),
                today() + chrono::Duration::days(30),
                1_000_000,
            )
            .unwrap();
            store.insert_invoice(&invoice).await.unwrap();
        }
        (store, creditor)
    }

    fn service(store: &InMemoryFinancingStore, batch_size: usize) -> InvoiceFinancingService {
        InvoiceFinancingService::new(
            Arc::new(store.clone()),
            Arc::new(LowestRateStrategy::new()),
            FinancingRunConfig::with_batch_size(batch_size),
        )
    }

    #[tokio::test]
    async fn finances_and_commits() {
        let (store, _) = seeded(50, 5).await;

        let summary = service(&store, 2).run_on(today()).await.unwrap();

        assert_eq!(summary.examined, 5);
        assert_eq!(summary.financed, 5);
        assert_eq!(summary.flushes, 2);
        assert_eq!(summary.financing_date, today());
        assert_eq!(store.count_pending().await.unwrap(), 0);
        assert!(!store.in_transaction().await);
        assert_eq!(store.stats().await.commits, 1);
    }

    #[tokio::test]
    async fn nothing_financed_when_caps_too_low() {
        let (store, _) = seeded(3, 4).await;

        let summary = service(&store, 2).run_on(today()).await.unwrap();

        assert_eq!(summary.examined, 4);
        assert_eq!(summary.financed, 0);
        assert_eq!(summary.flushes, 0);
        assert_eq!(store.count_pending().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn zero_batch_size_fails_before_begin() {
        let (store, _) = seeded(50, 1).await;

        let err = service(&store, 0).run_on(today()).await.unwrap_err();

        assert!(matches!(err, ApplicationError::Configuration(_)));
        assert!(!store.in_transaction().await);
        assert_eq!(store.stats().await.rollbacks, 0);
    }

    #[tokio::test]
    async fn unknown_creditor_aborts_and_rolls_back() {
        let (store, _) = seeded(50, 2).await;
        let orphan = Invoice::new(
            InvoiceId::new_v4(),
            CreditorId::new_v4(),
            DebtorId::new_v4(),
            today() + chrono::Duration::days(30),
            500,
        )
        .unwrap();
        store.insert_invoice(&orphan).await.unwrap();

        let err = service(&store, 10).run_on(today()).await.unwrap_err();

        assert!(err.is_contract_violation());
        assert_eq!(store.count_pending().await.unwrap(), 3);
        assert_eq!(store.stats().await.rollbacks, 1);
    }

    #[tokio::test]
    async fn summary_display() {
        let (store, _) = seeded(50, 1).await;
        let summary = service(&store, 10).run_on(today()).await.unwrap();
        assert!(summary.to_string().contains("financed 1 of 1"));
    }
}
