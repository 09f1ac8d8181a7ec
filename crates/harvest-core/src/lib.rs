//! Core types and trait definitions for the Harvest item ingester.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! fetcher, the store backend and the pipeline all depend on it; it depends on
//! nothing but serde and chrono.

pub mod coerce;
pub mod error;
pub mod item;
pub mod row;
pub mod source;
pub mod store;
pub mod table;

pub use error::{BoxError, ConfigError, FetchError, QueryError, StoreError};
pub use item::Item;
pub use row::ItemRow;
pub use table::TableName;
