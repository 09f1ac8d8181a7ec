//! The `ItemStore` trait.
//!
//! Implemented by storage backends (e.g. `harvest-store-sqlite`). The
//! pipeline depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{QueryError, StoreError, row::ItemRow};

/// Abstraction over the relational table items are ingested into.
///
/// Rows are insert-only; a stored item is never updated. The backend must
/// enforce at most one row per id and report a second insert of the same id
/// as [`StoreError::Conflict`]. That constraint, not [`exists`], is what
/// keeps ingestion idempotent under concurrency.
///
/// All methods return `Send` futures so the trait can be driven from spawned
/// tokio tasks.
///
/// [`exists`]: ItemStore::exists
pub trait ItemStore: Send + Sync {
  /// Whether a row with `id` is already stored.
  fn exists(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, QueryError>> + Send + '_;

  /// Insert one coerced row.
  fn insert(
    &self,
    row: ItemRow,
  ) -> impl Future<Output = Result<(), StoreError>> + Send + '_;
}
