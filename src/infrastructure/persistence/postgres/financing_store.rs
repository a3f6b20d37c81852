//! # PostgreSQL Financing Store
//!
//! PostgreSQL implementation of the financing ports using sqlx.
//!
//! A financing run holds one `sqlx::Transaction` from `begin` to
//! `commit`/`rollback`; every statement issued meanwhile goes through it.
//! Statements are sent as they are issued, so `flush` and `clear` have no
//! buffered state to act on. Outside a transaction, statements run directly
//! on the pool, and multi-statement writes open a short transaction of
//! their own.

use crate::domain::entities::{
    Creditor, Debtor, FinancingAmounts, Invoice, InvoiceFinancingDetails, Purchaser,
    PurchaserFinancingSettings,
};
use crate::domain::value_objects::{
    CreditorId, DebtorId, FinancingRunId, InvoiceId, PurchaserId,
};
use crate::infrastructure::persistence::traits::{
    CreditorRepository, DebtorRepository, FinancingDetailsRepository, InvoiceRepository,
    PurchaserRepository, RepositoryError, RepositoryResult, UnitOfWork,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use std::fmt;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Runs `$body` with `$exec` bound to the open transaction, or to the pool.
macro_rules! with_executor {
    ($store:expr, |$exec:ident| $body:expr) => {{
        let mut session = $store.tx.lock().await;
        match session.as_mut() {
            Some(tx) => {
                let $exec = &mut **tx;
                $body
            }
            None => {
                let $exec = &$store.pool;
                $body
            }
        }
    }};
}

/// PostgreSQL implementation of all financing repositories.
///
/// # Examples
///
/// ```ignore
/// use invoice_financing::infrastructure::persistence::postgres::PostgresFinancingStore;
///
/// let store = PostgresFinancingStore::connect("postgres://...", 10).await?;
/// store.migrate().await?;
/// ```
pub struct PostgresFinancingStore {
    pool: PgPool,
    tx: Mutex<Option<Transaction<'static, Postgres>>>,
}

impl fmt::Debug for PostgresFinancingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresFinancingStore")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl PostgresFinancingStore {
    /// Creates a store over an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            tx: Mutex::new(None),
        }
    }

    /// Connects a new pool.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Connection` if the database is unreachable.
    pub async fn connect(database_url: &str, max_connections: u32) -> RepositoryResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| RepositoryError::connection(e.to_string()))?;
        Ok(Self::new(pool))
    }

    /// Applies pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Internal` if a migration fails.
    pub async fn migrate(&self) -> RepositoryResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::internal(e.to_string()))
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn to_db_version(version: u64) -> RepositoryResult<i64> {
    i64::try_from(version)
        .map_err(|_| RepositoryError::serialization(format!("version {version} out of range")))
}

fn from_db_version(version: i64) -> RepositoryResult<u64> {
    u64::try_from(version)
        .map_err(|_| RepositoryError::serialization(format!("negative version {version}")))
}

#[async_trait]
impl CreditorRepository for PostgresFinancingStore {
    async fn save_creditor(&self, creditor: &Creditor) -> RepositoryResult<()> {
        with_executor!(self, |exec| {
            sqlx::query(
                r#"
                INSERT INTO creditors (id, name, max_financing_rate_in_bps)
                VALUES ($1, $2, $3)
                ON CONFLICT (id) DO UPDATE
                SET name = EXCLUDED.name,
                    max_financing_rate_in_bps = EXCLUDED.max_financing_rate_in_bps
                "#,
            )
            .bind(creditor.id().get())
            .bind(creditor.name())
            .bind(creditor.max_financing_rate_in_bps())
            .execute(exec)
            .await
        })
        .map_err(|e| RepositoryError::query(e.to_string()))?;
        Ok(())
    }

    async fn get_creditor(&self, id: &CreditorId) -> RepositoryResult<Option<Creditor>> {
        let row: Option<CreditorRow> = with_executor!(self, |exec| {
            sqlx::query_as(
                "SELECT id, name, max_financing_rate_in_bps FROM creditors WHERE id = $1",
            )
            .bind(id.get())
            .fetch_optional(exec)
            .await
        })
        .map_err(|e| RepositoryError::query(e.to_string()))?;
        Ok(row.map(CreditorRow::into_creditor))
    }

    async fn find_all_creditors(&self) -> RepositoryResult<Vec<Creditor>> {
        let rows: Vec<CreditorRow> = with_executor!(self, |exec| {
            sqlx::query_as("SELECT id, name, max_financing_rate_in_bps FROM creditors")
                .fetch_all(exec)
                .await
        })
        .map_err(|e| RepositoryError::query(e.to_string()))?;
        Ok(rows.into_iter().map(CreditorRow::into_creditor).collect())
    }
}

#[async_trait]
impl DebtorRepository for PostgresFinancingStore {
    async fn save_debtor(&self, debtor: &Debtor) -> RepositoryResult<()> {
        with_executor!(self, |exec| {
            sqlx::query(
                r#"
                INSERT INTO debtors (id, name) VALUES ($1, $2)
                ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name
                "#,
            )
            .bind(debtor.id().get())
            .bind(debtor.name())
            .execute(exec)
            .await
        })
        .map_err(|e| RepositoryError::query(e.to_string()))?;
        Ok(())
    }

    async fn get_debtor(&self, id: &DebtorId) -> RepositoryResult<Option<Debtor>> {
        let row: Option<(Uuid, String)> = with_executor!(self, |exec| {
            sqlx::query_as("SELECT id, name FROM debtors WHERE id = $1")
                .bind(id.get())
                .fetch_optional(exec)
                .await
        })
        .map_err(|e| RepositoryError::query(e.to_string()))?;
        Ok(row.map(|(id, name)| Debtor::from_parts(DebtorId::new(id), name)))
    }
}

#[async_trait]
impl PurchaserRepository for PostgresFinancingStore {
    async fn save_purchaser(&self, purchaser: &Purchaser) -> RepositoryResult<()> {
        let mut session = self.tx.lock().await;
        match session.as_mut() {
            Some(tx) => write_purchaser(&mut **tx, purchaser)
                .await
                .map_err(|e| RepositoryError::query(e.to_string())),
            None => {
                let mut tx = self
                    .pool
                    .begin()
                    .await
                    .map_err(|e| RepositoryError::connection(e.to_string()))?;
                write_purchaser(&mut *tx, purchaser)
                    .await
                    .map_err(|e| RepositoryError::query(e.to_string()))?;
                tx.commit()
                    .await
                    .map_err(|e| RepositoryError::connection(e.to_string()))
            }
        }
    }

    async fn get_purchaser(&self, id: &PurchaserId) -> RepositoryResult<Option<Purchaser>> {
        let rows: Vec<PurchaserSettingsRow> = with_executor!(self, |exec| {
            sqlx::query_as(
                r#"
                SELECT p.id, p.name, p.minimum_financing_term_in_days,
                       s.creditor_id, s.annual_rate_in_bps, s.credit_line_limit_in_cents
                FROM purchasers p
                LEFT JOIN purchaser_financing_settings s ON s.purchaser_id = p.id
                WHERE p.id = $1
                "#,
            )
            .bind(id.get())
            .fetch_all(exec)
            .await
        })
        .map_err(|e| RepositoryError::query(e.to_string()))?;
        Ok(group_purchasers(rows).into_iter().next())
    }

    async fn find_all_with_settings(&self) -> RepositoryResult<Vec<Purchaser>> {
        let rows: Vec<PurchaserSettingsRow> = with_executor!(self, |exec| {
            sqlx::query_as(
                r#"
                SELECT p.id, p.name, p.minimum_financing_term_in_days,
                       s.creditor_id, s.annual_rate_in_bps, s.credit_line_limit_in_cents
                FROM purchasers p
                LEFT JOIN purchaser_financing_settings s ON s.purchaser_id = p.id
                ORDER BY p.id
                "#,
            )
            .fetch_all(exec)
            .await
        })
        .map_err(|e| RepositoryError::query(e.to_string()))?;
        Ok(group_purchasers(rows))
    }
}

#[async_trait]
impl InvoiceRepository for PostgresFinancingStore {
    async fn insert_invoice(&self, invoice: &Invoice) -> RepositoryResult<()> {
        let version = to_db_version(invoice.version())?;
        let result = with_executor!(self, |exec| {
            sqlx::query(
                r#"
                INSERT INTO invoices (
                    id, creditor_id, debtor_id, maturity_date, value_in_cents,
                    early_payment_amount_in_cents, discounted_amount_in_cents, version
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(invoice.id().get())
            .bind(invoice.creditor_id().get())
            .bind(invoice.debtor_id().get())
            .bind(invoice.maturity_date())
            .bind(invoice.value_in_cents())
            .bind(invoice.early_payment_amount_in_cents())
            .bind(invoice.discounted_amount_in_cents())
            .bind(version)
            .execute(exec)
            .await
        })
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::duplicate("Invoice", invoice.id()));
        }
        Ok(())
    }

    async fn save_invoice(&self, invoice: &Invoice) -> RepositoryResult<Invoice> {
        let expected = to_db_version(invoice.version())?;
        let updated: Option<(i64,)> = with_executor!(self, |exec| {
            sqlx::query_as(
                r#"
                UPDATE invoices
                SET early_payment_amount_in_cents = $2,
                    discounted_amount_in_cents = $3,
                    version = version + 1
                WHERE id = $1
                  AND version = $4
                  AND early_payment_amount_in_cents IS NULL
                RETURNING version
                "#,
            )
            .bind(invoice.id().get())
            .bind(invoice.early_payment_amount_in_cents())
            .bind(invoice.discounted_amount_in_cents())
            .bind(expected)
            .fetch_optional(exec)
            .await
        })
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        if let Some((version,)) = updated {
            return Ok(invoice.clone().with_version(from_db_version(version)?));
        }

        let current: Option<(i64,)> = with_executor!(self, |exec| {
            sqlx::query_as("SELECT version FROM invoices WHERE id = $1")
                .bind(invoice.id().get())
                .fetch_optional(exec)
                .await
        })
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        match current {
            None => Err(RepositoryError::not_found("Invoice", invoice.id())),
            Some((actual,)) => Err(RepositoryError::version_conflict(
                "Invoice",
                invoice.id(),
                invoice.version(),
                from_db_version(actual)?,
            )),
        }
    }

    async fn get_invoice(&self, id: &InvoiceId) -> RepositoryResult<Option<Invoice>> {
        let row: Option<InvoiceRow> = with_executor!(self, |exec| {
            sqlx::query_as(
                r#"
                SELECT id, creditor_id, debtor_id, maturity_date, value_in_cents,
                       early_payment_amount_in_cents, discounted_amount_in_cents, version
                FROM invoices
                WHERE id = $1
                "#,
            )
            .bind(id.get())
            .fetch_optional(exec)
            .await
        })
        .map_err(|e| RepositoryError::query(e.to_string()))?;
        row.map(InvoiceRow::try_into_invoice).transpose()
    }

    async fn find_pending(&self) -> RepositoryResult<Vec<Invoice>> {
        let rows: Vec<InvoiceRow> = with_executor!(self, |exec| {
            sqlx::query_as(
                r#"
                SELECT id, creditor_id, debtor_id, maturity_date, value_in_cents,
                       early_payment_amount_in_cents, discounted_amount_in_cents, version
                FROM invoices
                WHERE early_payment_amount_in_cents IS NULL
                ORDER BY id
                "#,
            )
            .fetch_all(exec)
            .await
        })
        .map_err(|e| RepositoryError::query(e.to_string()))?;
        rows.into_iter().map(InvoiceRow::try_into_invoice).collect()
    }

    async fn count_pending(&self) -> RepositoryResult<u64> {
        let (count,): (i64,) = with_executor!(self, |exec| {
            sqlx::query_as(
                "SELECT COUNT(*) FROM invoices WHERE early_payment_amount_in_cents IS NULL",
            )
            .fetch_one(exec)
            .await
        })
        .map_err(|e| RepositoryError::query(e.to_string()))?;
        u64::try_from(count).map_err(|e| RepositoryError::serialization(e.to_string()))
    }
}

#[async_trait]
impl FinancingDetailsRepository for PostgresFinancingStore {
    async fn save_details(
        &self,
        details: &InvoiceFinancingDetails,
    ) -> RepositoryResult<InvoiceFinancingDetails> {
        let result = with_executor!(self, |exec| {
            sqlx::query(
                r#"
                INSERT INTO invoice_financing_details (
                    invoice_id, creditor_id, purchaser_id, run_id, financing_date,
                    financing_term_in_days, financing_rate_in_bps,
                    early_payment_amount_in_cents, discounted_amount_in_cents
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT (invoice_id) DO NOTHING
                "#,
            )
            .bind(details.invoice_id().get())
            .bind(details.creditor_id().get())
            .bind(details.purchaser_id().get())
            .bind(details.run_id().get())
            .bind(details.financing_date())
            .bind(details.financing_term_in_days())
            .bind(details.financing_rate_in_bps())
            .bind(details.early_payment_amount_in_cents())
            .bind(details.discounted_amount_in_cents())
            .execute(exec)
            .await
        })
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::duplicate(
                "InvoiceFinancingDetails",
                details.invoice_id(),
            ));
        }
        Ok(details.clone())
    }

    async fn get_details(
        &self,
        invoice_id: &InvoiceId,
    ) -> RepositoryResult<Option<InvoiceFinancingDetails>> {
        let row: Option<DetailsRow> = with_executor!(self, |exec| {
            sqlx::query_as(
                r#"
                SELECT invoice_id, creditor_id, purchaser_id, run_id, financing_date,
                       financing_term_in_days, financing_rate_in_bps,
                       early_payment_amount_in_cents, discounted_amount_in_cents
                FROM invoice_financing_details
                WHERE invoice_id = $1
                "#,
            )
            .bind(invoice_id.get())
            .fetch_optional(exec)
            .await
        })
        .map_err(|e| RepositoryError::query(e.to_string()))?;
        Ok(row.map(DetailsRow::into_details))
    }

    async fn find_by_run(
        &self,
        run_id: &FinancingRunId,
    ) -> RepositoryResult<Vec<InvoiceFinancingDetails>> {
        let rows: Vec<DetailsRow> = with_executor!(self, |exec| {
            sqlx::query_as(
                r#"
                SELECT invoice_id, creditor_id, purchaser_id, run_id, financing_date,
                       financing_term_in_days, financing_rate_in_bps,
                       early_payment_amount_in_cents, discounted_amount_in_cents
                FROM invoice_financing_details
                WHERE run_id = $1
                "#,
            )
            .bind(run_id.get())
            .fetch_all(exec)
            .await
        })
        .map_err(|e| RepositoryError::query(e.to_string()))?;
        Ok(rows.into_iter().map(DetailsRow::into_details).collect())
    }
}

#[async_trait]
impl UnitOfWork for PostgresFinancingStore {
    async fn begin(&self) -> RepositoryResult<()> {
        let mut session = self.tx.lock().await;
        if session.is_some() {
            return Err(RepositoryError::transaction("transaction already open"));
        }
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::connection(e.to_string()))?;
        *session = Some(tx);
        Ok(())
    }

    async fn flush(&self) -> RepositoryResult<()> {
        tracing::trace!("statements already sent; nothing to flush");
        Ok(())
    }

    async fn clear(&self) -> RepositoryResult<()> {
        Ok(())
    }

    async fn commit(&self) -> RepositoryResult<()> {
        let tx = self
            .tx
            .lock()
            .await
            .take()
            .ok_or_else(|| RepositoryError::transaction("no open transaction to commit"))?;
        tx.commit()
            .await
            .map_err(|e| RepositoryError::connection(e.to_string()))
    }

    async fn rollback(&self) -> RepositoryResult<()> {
        let tx = self.tx.lock().await.take().ok_or_else(|| {
            RepositoryError::transaction("no open transaction to roll back")
        })?;
        tx.rollback()
            .await
            .map_err(|e| RepositoryError::connection(e.to_string()))
    }
}

/// Upserts a purchaser and replaces its settings on one connection.
async fn write_purchaser(
    conn: &mut PgConnection,
    purchaser: &Purchaser,
) -> Result<(), sqlx::Error> {
    let id = purchaser.id().get();

    sqlx::query(
        r#"
        INSERT INTO purchasers (id, name, minimum_financing_term_in_days)
        VALUES ($1, $2, $3)
        ON CONFLICT (id) DO UPDATE
        SET name = EXCLUDED.name,
            minimum_financing_term_in_days = EXCLUDED.minimum_financing_term_in_days
        "#,
    )
    .bind(id)
    .bind(purchaser.name())
    .bind(purchaser.minimum_financing_term_in_days())
    .execute(&mut *conn)
    .await?;

    sqlx::query("DELETE FROM purchaser_financing_settings WHERE purchaser_id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    for settings in purchaser.settings() {
        sqlx::query(
            r#"
            INSERT INTO purchaser_financing_settings (
                purchaser_id, creditor_id, annual_rate_in_bps, credit_line_limit_in_cents
            ) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(settings.creditor_id().get())
        .bind(settings.annual_rate_in_bps())
        .bind(settings.credit_line_limit_in_cents())
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Row type for creditor queries.
#[derive(Debug, sqlx::FromRow)]
struct CreditorRow {
    id: Uuid,
    name: String,
    max_financing_rate_in_bps: i32,
}

impl CreditorRow {
    fn into_creditor(self) -> Creditor {
        Creditor::from_parts(
            CreditorId::new(self.id),
            self.name,
            self.max_financing_rate_in_bps,
        )
    }
}

/// Row type for the purchaser/settings join; settings columns are null for
/// purchasers without settings.
#[derive(Debug, sqlx::FromRow)]
struct PurchaserSettingsRow {
    id: Uuid,
    name: String,
    minimum_financing_term_in_days: i64,
    creditor_id: Option<Uuid>,
    annual_rate_in_bps: Option<i32>,
    credit_line_limit_in_cents: Option<i64>,
}

/// Folds join rows, ordered by purchaser, into purchasers with settings.
fn group_purchasers(rows: Vec<PurchaserSettingsRow>) -> Vec<Purchaser> {
    let mut grouped: Vec<(Uuid, String, i64, Vec<PurchaserFinancingSettings>)> = Vec::new();

    for row in rows {
        let settings = match (row.creditor_id, row.annual_rate_in_bps) {
            (Some(creditor), Some(rate)) => {
                let entry = PurchaserFinancingSettings::new(CreditorId::new(creditor), rate);
                Some(match row.credit_line_limit_in_cents {
                    Some(limit) => entry.with_credit_line_limit(limit),
                    None => entry,
                })
            }
            _ => None,
        };

        match grouped.last_mut() {
            Some((id, _, _, collected)) if *id == row.id => collected.extend(settings),
            _ => grouped.push((
                row.id,
                row.name,
                row.minimum_financing_term_in_days,
                settings.into_iter().collect(),
            )),
        }
    }

    grouped
        .into_iter()
        .map(|(id, name, minimum, settings)| {
            Purchaser::from_parts(PurchaserId::new(id), name, minimum, settings)
        })
        .collect()
}

/// Row type for invoice queries.
#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: Uuid,
    creditor_id: Uuid,
    debtor_id: Uuid,
    maturity_date: NaiveDate,
    value_in_cents: i64,
    early_payment_amount_in_cents: Option<i64>,
    discounted_amount_in_cents: Option<i64>,
    version: i64,
}

impl InvoiceRow {
    fn try_into_invoice(self) -> RepositoryResult<Invoice> {
        let financing = FinancingAmounts::from_nullable(
            self.early_payment_amount_in_cents,
            self.discounted_amount_in_cents,
            self.value_in_cents,
        )
        .map_err(|e| RepositoryError::serialization(e.to_string()))?;

        Ok(Invoice::from_parts(
            InvoiceId::new(self.id),
            CreditorId::new(self.creditor_id),
            DebtorId::new(self.debtor_id),
            self.maturity_date,
            self.value_in_cents,
            financing,
            from_db_version(self.version)?,
        ))
    }
}

/// Row type for financing detail queries.
#[derive(Debug, sqlx::FromRow)]
struct DetailsRow {
    invoice_id: Uuid,
    creditor_id: Uuid,
    purchaser_id: Uuid,
    run_id: Uuid,
    financing_date: NaiveDate,
    financing_term_in_days: i64,
    financing_rate_in_bps: i32,
    early_payment_amount_in_cents: i64,
    discounted_amount_in_cents: i64,
}

impl DetailsRow {
    fn into_details(self) -> InvoiceFinancingDetails {
        InvoiceFinancingDetails::from_parts(
            InvoiceId::new(self.invoice_id),
            CreditorId::new(self.creditor_id),
            PurchaserId::new(self.purchaser_id),
            FinancingRunId::new(self.run_id),
            self.financing_date,
            self.financing_term_in_days,
            self.financing_rate_in_bps,
            self.early_payment_amount_in_cents,
            self.discounted_amount_in_cents,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn settings_row(
        id: u128,
        name: &str,
        creditor: Option<u128>,
        rate: Option<i32>,
    ) -> PurchaserSettingsRow {
        PurchaserSettingsRow {
            id: Uuid::from_u128(id),
            name: name.to_string(),
            minimum_financing_term_in_days: 10,
            creditor_id: creditor.map(Uuid::from_u128),
            annual_rate_in_bps: rate,
            credit_line_limit_in_cents: None,
        }
    }

    fn invoice_row(early: Option<i64>, discounted: Option<i64>) -> InvoiceRow {
        InvoiceRow {
            id: Uuid::from_u128(1),
            creditor_id: Uuid::from_u128(2),
            debtor_id: Uuid::from_u128(3),
            maturity_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            value_in_cents: 10_000,
            early_payment_amount_in_cents: early,
            discounted_amount_in_cents: discounted,
            version: 2,
        }
    }

    mod grouping {
        use super::*;

        #[test]
        fn folds_settings_per_purchaser() {
            let rows = vec![
                settings_row(1, "RichBank", Some(10), Some(50)),
                settings_row(1, "RichBank", Some(11), Some(60)),
                settings_row(2, "FatBank", Some(10), Some(40)),
            ];

            let purchasers = group_purchasers(rows);

            assert_eq!(purchasers.len(), 2);
            assert_eq!(purchasers[0].name(), "RichBank");
            assert_eq!(purchasers[0].settings().len(), 2);
            assert_eq!(purchasers[1].settings().len(), 1);
        }

        #[test]
        fn keeps_purchasers_without_settings() {
            let purchasers = group_purchasers(vec![settings_row(3, "MegaBank", None, None)]);

            assert_eq!(purchasers.len(), 1);
            assert!(purchasers[0].settings().is_empty());
        }

        #[test]
        fn carries_credit_line_limit() {
            let mut row = settings_row(1, "RichBank", Some(10), Some(50));
            row.credit_line_limit_in_cents = Some(5_000_000);

            let purchasers = group_purchasers(vec![row]);

            assert_eq!(
                purchasers[0].settings()[0].credit_line_limit_in_cents(),
                Some(5_000_000)
            );
        }
    }

    mod invoice_rows {
        use super::*;

        #[test]
        fn pending_row() {
            let invoice = invoice_row(None, None).try_into_invoice().unwrap();
            assert!(invoice.is_pending());
            assert_eq!(invoice.version(), 2);
        }

        #[test]
        fn financed_row() {
            let invoice = invoice_row(Some(9_997), Some(3)).try_into_invoice().unwrap();
            assert_eq!(invoice.early_payment_amount_in_cents(), Some(9_997));
            assert_eq!(invoice.discounted_amount_in_cents(), Some(3));
        }

        #[test]
        fn half_financed_row_is_rejected() {
            let err = invoice_row(Some(9_997), None).try_into_invoice().unwrap_err();
            assert!(matches!(err, RepositoryError::Serialization(_)));
        }

        #[test]
        fn negative_version_is_rejected() {
            let mut row = invoice_row(None, None);
            row.version = -1;
            assert!(row.try_into_invoice().is_err());
        }
    }
}
