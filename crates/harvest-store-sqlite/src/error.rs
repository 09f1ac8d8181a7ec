//! Error type for `harvest-store-sqlite`.

use harvest_core::{QueryError, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A row without an id would silently get a fresh rowid.
  #[error("refusing to insert a row without an id")]
  MissingId,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for QueryError {
  fn from(e: Error) -> Self { QueryError::new(e) }
}

impl From<Error> for StoreError {
  fn from(e: Error) -> Self { StoreError::other(e) }
}
