//! Item persistence.
//!
//! # Data Flow
//! ```text
//! ItemRepository
//!     → ItemStore (trait object, injected at startup)
//!         → MongoStore  → Connector (one memoized client) → MongoDB
//!         → MemoryStore → DashMap (tests, --in-memory)
//! ```
//!
//! # Design Decisions
//! - Every operation is one single-document round trip; no transactions
//! - Stores see only validated input and parsed identifiers
//! - The store handle is shared across requests; the driver pools internally

pub mod connector;
pub mod memory;
pub mod mongo;

use async_trait::async_trait;

use crate::error::Result;
use crate::items::{Item, ItemChanges, ItemId, ValidItem};

pub use connector::{resolve_database_name, Connector, DEFAULT_DATABASE_NAME};
pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Storage backend for item records.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    /// Lightweight liveness probe.
    async fn ping(&self) -> Result<()>;

    /// All items, newest `createdAt` first.
    async fn find_all(&self) -> Result<Vec<Item>>;

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>>;

    /// Persist a new item; the store assigns `id` and `created_at`.
    async fn insert(&self, item: ValidItem) -> Result<Item>;

    /// Write the supplied fields and return the record as stored afterward,
    /// or `None` when no record has `id`.
    async fn update(&self, id: ItemId, changes: ItemChanges) -> Result<Option<Item>>;

    /// Remove the record, returning how many were deleted (0 or 1).
    async fn delete(&self, id: ItemId) -> Result<u64>;
}
