//! # In-Memory Financing Store
//!
//! In-memory implementation of every financing port, including a working
//! [`UnitOfWork`].
//!
//! Inside a transaction, writes land in a buffer. `flush` moves the buffer
//! into a flushed-but-uncommitted layer, `clear` drops the buffer, `commit`
//! publishes both layers and `rollback` discards them. Reads always see
//! buffer over flushed over committed.
//!
//! The store also counts unit-of-work calls and can inject failures, which
//! tests use to observe batching and rollback.

use crate::domain::entities::{Creditor, Debtor, Invoice, InvoiceFinancingDetails, Purchaser};
use crate::domain::value_objects::{
    CreditorId, DebtorId, FinancingRunId, InvoiceId, PurchaserId,
};
use crate::infrastructure::persistence::traits::{
    CreditorRepository, DebtorRepository, FinancingDetailsRepository, InvoiceRepository,
    PurchaserRepository, RepositoryError, RepositoryResult, UnitOfWork,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
struct Tables {
    creditors: HashMap<CreditorId, Creditor>,
    debtors: HashMap<DebtorId, Debtor>,
    purchasers: HashMap<PurchaserId, Purchaser>,
    invoices: HashMap<InvoiceId, Invoice>,
    details: HashMap<InvoiceId, InvoiceFinancingDetails>,
}

impl Tables {
    fn absorb(&mut self, other: Tables) {
        self.creditors.extend(other.creditors);
        self.debtors.extend(other.debtors);
        self.purchasers.extend(other.purchasers);
        self.invoices.extend(other.invoices);
        self.details.extend(other.details);
    }

    fn len(&self) -> usize {
        self.creditors.len()
            + self.debtors.len()
            + self.purchasers.len()
            + self.invoices.len()
            + self.details.len()
    }
}

#[derive(Debug, Default)]
struct Transaction {
    flushed: Tables,
    buffered: Tables,
}

/// Unit-of-work call counts observed by an [`InMemoryFinancingStore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Explicit `flush` calls (the implicit flush in `commit` is not counted).
    pub flushes: u64,
    /// `clear` calls.
    pub clears: u64,
    /// Successful commits.
    pub commits: u64,
    /// Rollbacks.
    pub rollbacks: u64,
    /// Largest number of entities held in the write buffer at once.
    pub peak_tracked: usize,
}

#[derive(Debug, Default)]
struct Faults {
    details_save: Option<u64>,
    flush: Option<u64>,
}

/// Counts down `slot`; returns true when the armed call is reached.
fn trip(slot: &mut Option<u64>) -> bool {
    match *slot {
        Some(remaining) if remaining <= 1 => {
            *slot = None;
            true
        }
        Some(remaining) => {
            *slot = Some(remaining - 1);
            false
        }
        None => false,
    }
}

#[derive(Debug, Default)]
struct State {
    committed: Tables,
    tx: Option<Transaction>,
    stats: StoreStats,
    faults: Faults,
}

impl State {
    fn lookup<K: Eq + Hash + 'static, V: 'static>(
        &self,
        key: &K,
        table: fn(&Tables) -> &HashMap<K, V>,
    ) -> Option<&V> {
        if let Some(tx) = &self.tx {
            if let Some(value) = table(&tx.buffered)
                .get(key)
                .or_else(|| table(&tx.flushed).get(key))
            {
                return Some(value);
            }
        }
        table(&self.committed).get(key)
    }

    fn visible<K: Eq + Hash + Clone + 'static, V: Clone + 'static>(
        &self,
        table: fn(&Tables) -> &HashMap<K, V>,
    ) -> HashMap<K, V> {
        let mut merged = table(&self.committed).clone();
        if let Some(tx) = &self.tx {
            merged.extend(table(&tx.flushed).clone());
            merged.extend(table(&tx.buffered).clone());
        }
        merged
    }

    fn write(&mut self, apply: impl FnOnce(&mut Tables)) {
        match &mut self.tx {
            Some(tx) => {
                apply(&mut tx.buffered);
                let tracked = tx.buffered.len();
                if tracked > self.stats.peak_tracked {
                    self.stats.peak_tracked = tracked;
                }
            }
            None => apply(&mut self.committed),
        }
    }
}

/// In-memory implementation of all financing repositories.
///
/// Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFinancingStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryFinancingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the unit-of-work call counts.
    pub async fn stats(&self) -> StoreStats {
        self.state.read().await.stats
    }

    /// Returns true while a transaction is open.
    pub async fn in_transaction(&self) -> bool {
        self.state.read().await.tx.is_some()
    }

    /// Makes the `n`th financing-record save from now fail.
    pub async fn fail_details_save_at(&self, n: u64) {
        self.state.write().await.faults.details_save = Some(n);
    }

    /// Makes the `n`th explicit flush from now fail.
    pub async fn fail_flush_at(&self, n: u64) {
        self.state.write().await.faults.flush = Some(n);
    }
}

#[async_trait]
impl CreditorRepository for InMemoryFinancingStore {
    async fn save_creditor(&self, creditor: &Creditor) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        state.write(|t| {
            t.creditors.insert(creditor.id(), creditor.clone());
        });
        Ok(())
    }

    async fn get_creditor(&self, id: &CreditorId) -> RepositoryResult<Option<Creditor>> {
        let state = self.state.read().await;
        Ok(state.lookup(id, |t| &t.creditors).cloned())
    }

    async fn find_all_creditors(&self) -> RepositoryResult<Vec<Creditor>> {
        let state = self.state.read().await;
        Ok(state.visible(|t| &t.creditors).into_values().collect())
    }
}

#[async_trait]
impl DebtorRepository for InMemoryFinancingStore {
    async fn save_debtor(&self, debtor: &Debtor) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        state.write(|t| {
            t.debtors.insert(debtor.id(), debtor.clone());
        });
        Ok(())
    }

    async fn get_debtor(&self, id: &DebtorId) -> RepositoryResult<Option<Debtor>> {
        let state = self.state.read().await;
        Ok(state.lookup(id, |t| &t.debtors).cloned())
    }
}

#[async_trait]
impl PurchaserRepository for InMemoryFinancingStore {
    async fn save_purchaser(&self, purchaser: &Purchaser) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        state.write(|t| {
            t.purchasers.insert(purchaser.id(), purchaser.clone());
        });
        Ok(())
    }

    async fn get_purchaser(&self, id: &PurchaserId) -> RepositoryResult<Option<Purchaser>> {
        let state = self.state.read().await;
        Ok(state.lookup(id, |t| &t.purchasers).cloned())
    }

    async fn find_all_with_settings(&self) -> RepositoryResult<Vec<Purchaser>> {
        let state = self.state.read().await;
        Ok(state.visible(|t| &t.purchasers).into_values().collect())
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryFinancingStore {
    async fn insert_invoice(&self, invoice: &Invoice) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        if state.lookup(&invoice.id(), |t| &t.invoices).is_some() {
            return Err(RepositoryError::duplicate("Invoice", invoice.id()));
        }
        state.write(|t| {
            t.invoices.insert(invoice.id(), invoice.clone());
        });
        Ok(())
    }

    async fn save_invoice(&self, invoice: &Invoice) -> RepositoryResult<Invoice> {
        let mut state = self.state.write().await;
        let current = state
            .lookup(&invoice.id(), |t| &t.invoices)
            .map(Invoice::version)
            .ok_or_else(|| RepositoryError::not_found("Invoice", invoice.id()))?;
        if current != invoice.version() {
            return Err(RepositoryError::version_conflict(
                "Invoice",
                invoice.id(),
                invoice.version(),
                current,
            ));
        }

        let saved = invoice.clone().with_version(current + 1);
        state.write(|t| {
            t.invoices.insert(saved.id(), saved.clone());
        });
        Ok(saved)
    }

    async fn get_invoice(&self, id: &InvoiceId) -> RepositoryResult<Option<Invoice>> {
        let state = self.state.read().await;
        Ok(state.lookup(id, |t| &t.invoices).cloned())
    }

    async fn find_pending(&self) -> RepositoryResult<Vec<Invoice>> {
        let state = self.state.read().await;
        let mut pending: Vec<Invoice> = state
            .visible(|t| &t.invoices)
            .into_values()
            .filter(Invoice::is_pending)
            .collect();
        pending.sort_by_key(Invoice::id);
        Ok(pending)
    }

    async fn count_pending(&self) -> RepositoryResult<u64> {
        let state = self.state.read().await;
        let count = state
            .visible(|t| &t.invoices)
            .values()
            .filter(|i| i.is_pending())
            .count();
        Ok(count as u64)
    }
}

#[async_trait]
impl FinancingDetailsRepository for InMemoryFinancingStore {
    async fn save_details(
        &self,
        details: &InvoiceFinancingDetails,
    ) -> RepositoryResult<InvoiceFinancingDetails> {
        let mut state = self.state.write().await;
        if trip(&mut state.faults.details_save) {
            return Err(RepositoryError::internal("injected financing details failure"));
        }
        if state.lookup(&details.invoice_id(), |t| &t.details).is_some() {
            return Err(RepositoryError::duplicate(
                "InvoiceFinancingDetails",
                details.invoice_id(),
            ));
        }
        state.write(|t| {
            t.details.insert(details.invoice_id(), details.clone());
        });
        Ok(details.clone())
    }

    async fn get_details(
        &self,
        invoice_id: &InvoiceId,
    ) -> RepositoryResult<Option<InvoiceFinancingDetails>> {
        let state = self.state.read().await;
        Ok(state.lookup(invoice_id, |t| &t.details).cloned())
    }

    async fn find_by_run(
        &self,
        run_id: &FinancingRunId,
    ) -> RepositoryResult<Vec<InvoiceFinancingDetails>> {
        let state = self.state.read().await;
        Ok(state
            .visible(|t| &t.details)
            .into_values()
            .filter(|d| d.run_id() == *run_id)
            .collect())
    }
}

#[async_trait]
impl UnitOfWork for InMemoryFinancingStore {
    async fn begin(&self) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        if state.tx.is_some() {
            return Err(RepositoryError::transaction("transaction already open"));
        }
        state.tx = Some(Transaction::default());
        Ok(())
    }

    async fn flush(&self) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        if trip(&mut state.faults.flush) {
            return Err(RepositoryError::connection("injected flush failure"));
        }
        state.stats.flushes += 1;
        if let Some(tx) = &mut state.tx {
            let buffered = std::mem::take(&mut tx.buffered);
            tx.flushed.absorb(buffered);
        }
        Ok(())
    }

    async fn clear(&self) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        state.stats.clears += 1;
        if let Some(tx) = &mut state.tx {
            tx.buffered = Tables::default();
        }
        Ok(())
    }

    async fn commit(&self) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        let tx = state
            .tx
            .take()
            .ok_or_else(|| RepositoryError::transaction("no open transaction to commit"))?;
        state.committed.absorb(tx.flushed);
        state.committed.absorb(tx.buffered);
        state.stats.commits += 1;
        Ok(())
    }

    async fn rollback(&self) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        if state.tx.take().is_none() {
            return Err(RepositoryError::transaction(
                "no open transaction to roll back",
            ));
        }
        state.stats.rollbacks += 1;
        Ok(())
    }
}
