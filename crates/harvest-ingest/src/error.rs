//! Per-item failure type for `harvest-ingest`.

use harvest_core::{FetchError, QueryError, StoreError};
use thiserror::Error;

/// Why one id could not be ingested. Recorded in the batch report; the worker
/// moves on to the next id.
#[derive(Debug, Error)]
pub enum IngestError {
  #[error(transparent)]
  Query(#[from] QueryError),

  #[error(transparent)]
  Fetch(#[from] FetchError),

  #[error(transparent)]
  Store(#[from] StoreError),
}
