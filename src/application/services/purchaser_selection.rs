//! # Purchaser Selection
//!
//! Picks the winning purchaser for an invoice.
//!
//! [`PurchaserSelectionService`] computes the invoice's term once, runs every
//! purchaser in the pool through the eligibility rules, and hands the
//! eligible candidates to a [`SelectionStrategy`].

use crate::domain::entities::{Creditor, Invoice, PurchaserFinancingResult};
use crate::domain::services::{EligibilityEvaluator, FinancingCalculator, PurchaserPool};
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;

/// Trait for choosing among eligible candidates.
pub trait SelectionStrategy: Send + Sync + fmt::Debug {
    /// Returns the winner, or `None` if there are no candidates.
    fn select(&self, candidates: &[PurchaserFinancingResult]) -> Option<PurchaserFinancingResult>;

    /// Returns the name of this strategy.
    fn name(&self) -> &'static str;
}

/// Cheapest-for-the-creditor selection.
///
/// Orders by rounded rate, then exact rate, then purchaser identity, so the
/// winner never depends on the order candidates were evaluated in.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowestRateStrategy;

impl LowestRateStrategy {
    /// Creates a new lowest rate strategy.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SelectionStrategy for LowestRateStrategy {
    fn select(&self, candidates: &[PurchaserFinancingResult]) -> Option<PurchaserFinancingResult> {
        candidates
            .iter()
            .min_by(|a, b| a.cmp_by_cost(b))
            .copied()
    }

    fn name(&self) -> &'static str {
        "LowestRate"
    }
}

/// Finds the best purchaser for one invoice.
#[derive(Debug, Clone)]
pub struct PurchaserSelectionService {
    calculator: FinancingCalculator,
    evaluator: EligibilityEvaluator,
    strategy: Arc<dyn SelectionStrategy>,
}

impl Default for PurchaserSelectionService {
    fn default() -> Self {
        Self::new(Arc::new(LowestRateStrategy::new()))
    }
}

impl PurchaserSelectionService {
    /// Creates a selection service with the given strategy.
    #[must_use]
    pub fn new(strategy: Arc<dyn SelectionStrategy>) -> Self {
        let calculator = FinancingCalculator::new();
        Self {
            calculator,
            evaluator: EligibilityEvaluator::new(calculator),
            strategy,
        }
    }

    /// Returns the active strategy's name.
    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Evaluates every purchaser in `pool` and returns the winner, if any.
    ///
    /// `creditor` must be the invoice's creditor.
    #[must_use]
    pub fn find_best_purchaser(
        &self,
        invoice: &Invoice,
        creditor: &Creditor,
        pool: &PurchaserPool,
        financing_date: NaiveDate,
    ) -> Option<PurchaserFinancingResult> {
        let term = self
            .calculator
            .financing_term(financing_date, invoice.maturity_date());

        let candidates: Vec<PurchaserFinancingResult> = pool
            .purchasers()
            .iter()
            .filter_map(|p| {
                self.evaluator
                    .evaluate(pool, p, creditor, term, financing_date)
            })
            .collect();

        let winner = self.strategy.select(&candidates);
        tracing::debug!(
            invoice = %invoice.id(),
            financing_term_in_days = term,
            eligible = candidates.len(),
            winner = ?winner.map(|w| w.purchaser_id),
            "purchaser selection finished"
        );
        winner
    }
}
