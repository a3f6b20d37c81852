//! # PostgreSQL Store
//!
//! sqlx-backed implementation of the financing ports. The schema lives in
//! `migrations/` and is applied with [`PostgresFinancingStore::migrate`].

pub mod financing_store;

pub use financing_store::PostgresFinancingStore;
