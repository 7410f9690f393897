//! Orders
//!
//! - [`OrderStore`] - persistence contract, with SQLite and in-memory backends
//! - [`OrderService`] - write deadlines, read retries, checkout

pub mod memory;
pub mod service;
pub mod sqlite;
pub mod store;

pub use memory::InMemoryOrderStore;
pub use service::{OrderLineRequest, OrderService};
pub use sqlite::SqliteOrderStore;
pub use store::{OrderStore, StoreError, StoreResult};
