//! Invoice financing CLI.
//!
//! - `demo`: seeds an in-memory store and runs two financing passes
//! - `run`: migrates PostgreSQL and runs one financing pass against it

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use invoice_financing::application::services::{
    FinancingReport, FinancingReportService, FinancingRunSummary, InvoiceFinancingService,
    LowestRateStrategy,
};
use invoice_financing::infrastructure::persistence::{
    FinancingStore, InMemoryFinancingStore, PostgresFinancingStore,
};
use invoice_financing::infrastructure::seed;
use invoice_financing::infrastructure::{FinancingConfig, init_tracing};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "invoice-financing")]
#[command(about = "Allocates pending invoices to the cheapest eligible purchaser", long_about = None)]
struct Cli {
    /// Overrides the configured batch size
    #[arg(long, global = true)]
    batch_size: Option<usize>,

    /// Financing date (YYYY-MM-DD), defaults to today in UTC
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    /// Print summaries and reports as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed demo data in memory and run two financing passes
    Demo,

    /// Migrate the configured database and run one financing pass
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = FinancingConfig::load().context("loading configuration")?;
    if let Some(batch_size) = cli.batch_size {
        config.batch_size = batch_size;
    }
    config.validate()?;
    init_tracing(config.log_format).context("installing tracing subscriber")?;

    let today = cli.date.unwrap_or_else(|| Utc::now().date_naive());

    match cli.command {
        Commands::Demo => demo(&config, today, cli.json).await,
        Commands::Run => run(&config, today, cli.json).await,
    }
}

async fn demo(config: &FinancingConfig, today: NaiveDate, json: bool) -> Result<()> {
    let store = InMemoryFinancingStore::new();
    let parties = seed::seed_master_data(&store).await?;

    seed::seed_first_batch(&store, &parties, today).await?;
    financing_pass(Arc::new(store.clone()), config, today, json).await?;

    seed::seed_second_batch(&store, &parties, today).await?;
    financing_pass(Arc::new(store.clone()), config, today, json).await?;

    let stats = store.stats().await;
    tracing::info!(
        flushes = stats.flushes,
        commits = stats.commits,
        rollbacks = stats.rollbacks,
        "demo finished"
    );
    Ok(())
}

async fn run(config: &FinancingConfig, today: NaiveDate, json: bool) -> Result<()> {
    let store =
        PostgresFinancingStore::connect(config.require_database_url()?, config.max_connections)
            .await
            .context("connecting to database")?;
    store.migrate().await.context("applying migrations")?;
    financing_pass(Arc::new(store), config, today, json).await
}

async fn financing_pass(
    store: Arc<dyn FinancingStore>,
    config: &FinancingConfig,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let service = InvoiceFinancingService::new(
        Arc::clone(&store),
        Arc::new(LowestRateStrategy::new()),
        config.run_config(),
    );
    let summary = service.run_on(today).await?;
    let report = FinancingReportService::new(store)
        .generate(summary.run_id)
        .await?;
    print_outcome(&summary, &report, json)
}

fn print_outcome(summary: &FinancingRunSummary, report: &FinancingReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{summary}");
        print!("{report}");
    }
    Ok(())
}
