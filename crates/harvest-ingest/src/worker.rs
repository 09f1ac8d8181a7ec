//! The batch worker: check, fetch, coerce, store, one id at a time.

use std::time::Duration;

use harvest_core::{
  FetchError, ItemRow, QueryError, StoreError, source::ItemSource,
  store::ItemStore,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
  IngestError,
  partition::Batch,
  report::{BatchReport, BatchStatus, ItemFailure},
};

/// What happened to one id that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Inserted,
  AlreadyPresent,
  Duplicate,
  Missing,
}

/// Walk `batch` in increasing id order. Each id's check-fetch-store sequence
/// completes before the next id starts. Failures are recorded and the walk
/// continues; cancellation stops it before the next id.
pub async fn run_batch<S, F>(
  batch: Batch,
  store: &S,
  source: &F,
  retry_backoff: Duration,
  cancel: &CancellationToken,
) -> BatchReport
where
  S: ItemStore,
  F: ItemSource,
{
  info!(start = batch.start, end = batch.end, "batch started");
  let mut report = BatchReport::new(batch);

  for id in batch.ids() {
    if cancel.is_cancelled() {
      report.status = BatchStatus::Cancelled { next_id: id };
      break;
    }

    match ingest_one(id, store, source, retry_backoff).await {
      Ok(Outcome::Inserted) => {
        report.tally.inserted += 1;
        debug!(id, "item stored");
      }
      Ok(Outcome::AlreadyPresent) => {
        report.tally.already_present += 1;
        debug!(id, "item already present");
      }
      Ok(Outcome::Duplicate) => {
        report.tally.duplicates += 1;
        debug!(id, "item stored concurrently by another worker");
      }
      Ok(Outcome::Missing) => {
        report.tally.missing += 1;
        warn!(id, "source has no item under this id");
      }
      Err(error) => {
        warn!(id, %error, "item failed");
        report.failures.push(ItemFailure { id, error });
      }
    }
  }

  match report.status {
    BatchStatus::Cancelled { next_id } => info!(
      start = batch.start,
      end = batch.end,
      next_id,
      inserted = report.tally.inserted,
      failed = report.failures.len(),
      "batch cancelled"
    ),
    _ => info!(
      start = batch.start,
      end = batch.end,
      inserted = report.tally.inserted,
      already_present = report.tally.already_present,
      failed = report.failures.len(),
      "batch finished"
    ),
  }
  report
}

/// Run the check-fetch-store sequence for a single id.
pub async fn ingest_one<S, F>(
  id: i64,
  store: &S,
  source: &F,
  retry_backoff: Duration,
) -> Result<Outcome, IngestError>
where
  S: ItemStore,
  F: ItemSource,
{
  if exists_with_retry(id, store, retry_backoff).await? {
    return Ok(Outcome::AlreadyPresent);
  }

  // A `null` body or an id-less record never reaches the store.
  let Some(item) = source.fetch(id).await? else {
    return Ok(Outcome::Missing);
  };
  // The existence check above was for `id`; storing anything else would leave
  // `id` absent forever.
  if item.id != id {
    return Err(
      FetchError::IdMismatch {
        requested: id,
        received:  item.id,
      }
      .into(),
    );
  }

  match store.insert(ItemRow::from(&item)).await {
    Ok(()) => Ok(Outcome::Inserted),
    Err(StoreError::Conflict(_)) => Ok(Outcome::Duplicate),
    Err(e) => Err(e.into()),
  }
}

/// A store outage is likely transient: one retry after `backoff`.
async fn exists_with_retry<S: ItemStore>(
  id: i64,
  store: &S,
  backoff: Duration,
) -> Result<bool, QueryError> {
  match store.exists(id).await {
    Ok(found) => Ok(found),
    Err(error) => {
      warn!(id, %error, "existence check failed; retrying once");
      tokio::time::sleep(backoff).await;
      store.exists(id).await
    }
  }
}
