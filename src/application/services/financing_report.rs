//! # Financing Report
//!
//! Per-run totals grouped by purchaser and creditor: what each purchaser
//! paid each creditor up front and the interest it earned doing so.

use crate::application::error::ApplicationResult;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{CheckedArithmetic, CreditorId, FinancingRunId, PurchaserId};
use crate::infrastructure::persistence::traits::{FinancingStore, RepositoryError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Totals for one purchaser/creditor pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancingReportLine {
    /// The purchaser.
    pub purchaser_id: PurchaserId,
    /// Purchaser name.
    pub purchaser_name: String,
    /// The creditor.
    pub creditor_id: CreditorId,
    /// Creditor name.
    pub creditor_name: String,
    /// Invoices financed for the pair.
    pub invoice_count: u64,
    /// Sum of early payments made to the creditor.
    pub total_creditor_payment_in_cents: i64,
    /// Sum of discounts earned by the purchaser.
    pub total_purchaser_interest_in_cents: i64,
}

impl fmt::Display for FinancingReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {} invoices, paid {}c, interest {}c",
            self.purchaser_name,
            self.creditor_name,
            self.invoice_count,
            self.total_creditor_payment_in_cents,
            self.total_purchaser_interest_in_cents
        )
    }
}

/// Report of one financing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancingReport {
    /// The run.
    pub run_id: FinancingRunId,
    /// Lines sorted by purchaser name, then creditor name.
    pub lines: Vec<FinancingReportLine>,
}

impl FinancingReport {
    /// Returns true if the run financed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the number of invoices across all lines.
    #[must_use]
    pub fn invoice_count(&self) -> u64 {
        self.lines.iter().map(|l| l.invoice_count).sum()
    }
}

impl fmt::Display for FinancingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Financing report for run {}", self.run_id)?;
        for line in &self.lines {
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Totals {
    invoices: u64,
    payments: i64,
    interest: i64,
}

/// Builds financing reports from stored records.
#[derive(Debug, Clone)]
pub struct FinancingReportService {
    store: Arc<dyn FinancingStore>,
}

impl FinancingReportService {
    /// Creates a report service.
    #[must_use]
    pub fn new(store: Arc<dyn FinancingStore>) -> Self {
        Self { store }
    }

    /// Builds the report of `run_id`.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Repository` if loading fails or a record
    /// references an unknown purchaser or creditor, and
    /// `ApplicationError::Domain` if a total overflows.
    pub async fn generate(&self, run_id: FinancingRunId) -> ApplicationResult<FinancingReport> {
        let details = self.store.find_by_run(&run_id).await?;

        let mut totals: BTreeMap<(PurchaserId, CreditorId), Totals> = BTreeMap::new();
        for record in &details {
            let entry = totals
                .entry((record.purchaser_id(), record.creditor_id()))
                .or_default();
            entry.invoices += 1;
            entry.payments = entry
                .payments
                .safe_add(record.early_payment_amount_in_cents())
                .map_err(DomainError::from)?;
            entry.interest = entry
                .interest
                .safe_add(record.discounted_amount_in_cents())
                .map_err(DomainError::from)?;
        }

        let purchasers: HashMap<PurchaserId, String> = self
            .store
            .find_all_with_settings()
            .await?
            .into_iter()
            .map(|p| (p.id(), p.name().to_string()))
            .collect();
        let creditors: HashMap<CreditorId, String> = self
            .store
            .find_all_creditors()
            .await?
            .into_iter()
            .map(|c| (c.id(), c.name().to_string()))
            .collect();

        let mut lines = Vec::with_capacity(totals.len());
        for ((purchaser_id, creditor_id), sums) in totals {
            let purchaser_name = purchasers
                .get(&purchaser_id)
                .cloned()
                .ok_or_else(|| RepositoryError::not_found("Purchaser", purchaser_id))?;
            let creditor_name = creditors
                .get(&creditor_id)
                .cloned()
                .ok_or_else(|| RepositoryError::not_found("Creditor", creditor_id))?;
            lines.push(FinancingReportLine {
                purchaser_id,
                purchaser_name,
                creditor_id,
                creditor_name,
                invoice_count: sums.invoices,
                total_creditor_payment_in_cents: sums.payments,
                total_purchaser_interest_in_cents: sums.interest,
            });
        }
        lines.sort_by(|a, b| {
            a.purchaser_name
                .cmp(&b.purchaser_name)
                .then_with(|| a.creditor_name.cmp(&b.creditor_name))
        });

        tracing::info!(%run_id, lines = lines.len(), records = details.len(), "financing report built");
        Ok(FinancingReport { run_id, lines })
    }
}
