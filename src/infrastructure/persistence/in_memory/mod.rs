//! # In-Memory Store
//!
//! In-memory implementation of the financing ports for tests and the demo
//! command, without database dependencies.
//!
//! ## Thread Safety
//!
//! State lives behind a single `Arc<RwLock<..>>`, so clones share one store.

pub mod financing_store;

pub use financing_store::{InMemoryFinancingStore, StoreStats};
