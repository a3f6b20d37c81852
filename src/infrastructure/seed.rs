//! # Demo Seeding
//!
//! Master data and invoice batches for demo runs: three creditors, three
//! debtors and three purchasers with per-creditor rates, plus two invoice
//! batches maturing relative to a given day.
//!
//! | Purchaser | Min term | Coffee Beans LLC | Home Brew | Beanstalk |
//! |-----------|----------|------------------|-----------|-----------|
//! | RichBank  | 10 days  | 50 bps           | 60 bps    | 30 bps    |
//! | FatBank   | 12 days  | 40 bps           | 80 bps    | 25 bps    |
//! | MegaBank  | 8 days   | 50 bps           | 60 bps    | 45 bps    |

use crate::domain::entities::{Creditor, Debtor, Invoice, Purchaser, PurchaserFinancingSettings};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{CreditorId, DebtorId, InvoiceId, PurchaserId};
use crate::infrastructure::persistence::traits::{FinancingStore, RepositoryError};
use chrono::{Days, NaiveDate};
use thiserror::Error;

/// Error type for seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Seed data failed validation.
    #[error("invalid seed data: {0}")]
    Domain(#[from] DomainError),

    /// Seed data could not be stored.
    #[error("failed to store seed data: {0}")]
    Repository(#[from] RepositoryError),

    /// A maturity date fell outside the calendar range.
    #[error("maturity date out of range: {0} + {1} days")]
    DateOutOfRange(NaiveDate, u64),
}

/// Seeded master data.
#[derive(Debug, Clone)]
pub struct DemoParties {
    /// Coffee Beans LLC, Home Brew, Beanstalk.
    pub creditors: [Creditor; 3],
    /// Chocolate Factory, Sweets Inc, ChocoLoco.
    pub debtors: [Debtor; 3],
    /// RichBank, FatBank, MegaBank.
    pub purchasers: [Purchaser; 3],
}

/// (creditor index, debtor index, value in cents, days to maturity)
type InvoiceSeed = (usize, usize, i64, u64);

const FIRST_BATCH: [InvoiceSeed; 6] = [
    (0, 0, 100_000, 50),
    (0, 1, 250_000, 30),
    (1, 2, 75_000, 90),
    (2, 0, 1_200_000, 15),
    (2, 1, 50_000, 5),
    (1, 0, 300_000, 20),
];

const SECOND_BATCH: [InvoiceSeed; 3] = [(0, 0, 100, 52), (1, 1, 500_000, 45), (2, 2, 80_000, 40)];

fn creditor(name: &str, max_rate_in_bps: i32) -> Result<Creditor, DomainError> {
    Creditor::new(CreditorId::new_v4(), name, max_rate_in_bps)
}

fn purchaser(
    name: &str,
    minimum_term_in_days: i64,
    creditors: &[Creditor; 3],
    rates_in_bps: [i32; 3],
) -> Result<Purchaser, DomainError> {
    creditors.iter().zip(rates_in_bps).try_fold(
        Purchaser::new(PurchaserId::new_v4(), name, minimum_term_in_days)?,
        |purchaser, (creditor, rate)| {
            purchaser.with_settings(PurchaserFinancingSettings::new(creditor.id(), rate))
        },
    )
}

/// Stores the demo creditors, debtors and purchasers.
///
/// # Errors
///
/// Returns `SeedError::Repository` if a save fails.
pub async fn seed_master_data<S: FinancingStore + ?Sized>(
    store: &S,
) -> Result<DemoParties, SeedError> {
    let creditors = [
        creditor("Coffee Beans LLC", 6)?,
        creditor("Home Brew", 7)?,
        creditor("Beanstalk", 4)?,
    ];
    let debtors = [
        Debtor::new(DebtorId::new_v4(), "Chocolate Factory")?,
        Debtor::new(DebtorId::new_v4(), "Sweets Inc")?,
        Debtor::new(DebtorId::new_v4(), "ChocoLoco")?,
    ];
    let purchasers = [
        purchaser("RichBank", 10, &creditors, [50, 60, 30])?,
        purchaser("FatBank", 12, &creditors, [40, 80, 25])?,
        purchaser("MegaBank", 8, &creditors, [50, 60, 45])?,
    ];

    for c in &creditors {
        store.save_creditor(c).await?;
    }
    for d in &debtors {
        store.save_debtor(d).await?;
    }
    for p in &purchasers {
        store.save_purchaser(p).await?;
    }

    tracing::info!(
        creditors = creditors.len(),
        debtors = debtors.len(),
        purchasers = purchasers.len(),
        "seeded master data"
    );
    Ok(DemoParties {
        creditors,
        debtors,
        purchasers,
    })
}

async fn seed_invoices<S: FinancingStore + ?Sized>(
    store: &S,
    parties: &DemoParties,
    today: NaiveDate,
    batch: &[InvoiceSeed],
) -> Result<Vec<InvoiceId>, SeedError> {
    let mut ids = Vec::with_capacity(batch.len());
    for &(creditor, debtor, value_in_cents, days) in batch {
        let (Some(creditor), Some(debtor)) =
            (parties.creditors.get(creditor), parties.debtors.get(debtor))
        else {
            continue;
        };
        let maturity = today
            .checked_add_days(Days::new(days))
            .ok_or(SeedError::DateOutOfRange(today, days))?;
        let invoice = Invoice::new(
            InvoiceId::new_v4(),
            creditor.id(),
            debtor.id(),
            maturity,
            value_in_cents,
        )?;
        store.insert_invoice(&invoice).await?;
        ids.push(invoice.id());
    }
    tracing::info!(invoices = ids.len(), %today, "seeded invoices");
    Ok(ids)
}

/// Stores the first demo batch of pending invoices.
///
/// # Errors
///
/// Returns `SeedError` if an invoice is invalid or cannot be stored.
pub async fn seed_first_batch<S: FinancingStore + ?Sized>(
    store: &S,
    parties: &DemoParties,
    today: NaiveDate,
) -> Result<Vec<InvoiceId>, SeedError> {
    seed_invoices(store, parties, today, &FIRST_BATCH).await
}

/// Stores the second demo batch of pending invoices.
///
/// # Errors
///
/// Returns `SeedError` if an invoice is invalid or cannot be stored.
pub async fn seed_second_batch<S: FinancingStore + ?Sized>(
    store: &S,
    parties: &DemoParties,
    today: NaiveDate,
) -> Result<Vec<InvoiceId>, SeedError> {
    seed_invoices(store, parties, today, &SECOND_BATCH).await
}
