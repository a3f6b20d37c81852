//! PostgreSQL store behaviour against a live database.
//!
//! Run with `FINANCING_DATABASE_URL` set and `cargo test -- --ignored`.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use invoice_financing::domain::entities::{Creditor, Purchaser, PurchaserFinancingSettings};
use invoice_financing::domain::value_objects::{CreditorId, PurchaserId};
use invoice_financing::infrastructure::persistence::{
    CreditorRepository, PostgresFinancingStore, PurchaserRepository,
};

async fn store() -> PostgresFinancingStore {
    let url = std::env::var("FINANCING_DATABASE_URL").unwrap();
    let store = PostgresFinancingStore::connect(&url, 2).await.unwrap();
    store.migrate().await.unwrap();
    store
}

async fn creditor(store: &PostgresFinancingStore) -> Creditor {
    let creditor = Creditor::new(CreditorId::new_v4(), "Coffee Beans LLC", 50).unwrap();
    store.save_creditor(&creditor).await.unwrap();
    creditor
}

#[tokio::test]
#[ignore = "requires FINANCING_DATABASE_URL"]
async fn purchaser_with_unknown_creditor_is_not_half_saved() {
    let store = store().await;
    let known = creditor(&store).await;
    let purchaser = Purchaser::new(PurchaserId::new_v4(), "RichBank", 10)
        .unwrap()
        .with_settings(PurchaserFinancingSettings::new(known.id(), 40))
        .unwrap()
        .with_settings(PurchaserFinancingSettings::new(CreditorId::new_v4(), 40))
        .unwrap();

    assert!(store.save_purchaser(&purchaser).await.is_err());

    assert!(store.get_purchaser(&purchaser.id()).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires FINANCING_DATABASE_URL"]
async fn failed_resave_keeps_previous_settings() {
    let store = store().await;
    let known = creditor(&store).await;
    let original = Purchaser::new(PurchaserId::new_v4(), "FatBank", 12)
        .unwrap()
        .with_settings(PurchaserFinancingSettings::new(known.id(), 25))
        .unwrap();
    store.save_purchaser(&original).await.unwrap();

    let broken = Purchaser::new(original.id(), "FatBank", 5)
        .unwrap()
        .with_settings(PurchaserFinancingSettings::new(CreditorId::new_v4(), 30))
        .unwrap();
    assert!(store.save_purchaser(&broken).await.is_err());

    let stored = store.get_purchaser(&original.id()).await.unwrap().unwrap();
    assert_eq!(stored.minimum_financing_term_in_days(), 12);
    assert_eq!(stored.settings().len(), 1);
    assert_eq!(
        stored.settings_for(known.id()).unwrap().annual_rate_in_bps(),
        25
    );
}
