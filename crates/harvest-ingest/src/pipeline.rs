//! [`Pipeline`] — runs batch workers on a bounded pool and joins them all.

use std::{collections::HashMap, sync::Arc, time::Duration};

use harvest_core::{ConfigError, source::ItemSource, store::ItemStore};
use tokio::{task::JoinSet, time::Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
  partition::{Batch, Batches, partition},
  report::{BatchReport, RunSummary},
  worker,
};

/// Validated pipeline settings.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
  pub min_id:              i64,
  pub max_id:              i64,
  pub batch_size:          u64,
  /// Most workers running at once, independent of the number of batches.
  pub concurrency:         usize,
  /// Pause before the single retry of a failed existence check.
  pub query_retry_backoff: Duration,
}

impl PipelineConfig {
  pub const DEFAULT_BATCH_SIZE: u64 = 100_000;
  pub const DEFAULT_CONCURRENCY: usize = 8;
  pub const DEFAULT_QUERY_RETRY_BACKOFF: Duration = Duration::from_millis(500);

  pub fn new(min_id: i64, max_id: i64) -> Self {
    Self {
      min_id,
      max_id,
      batch_size: Self::DEFAULT_BATCH_SIZE,
      concurrency: Self::DEFAULT_CONCURRENCY,
      query_retry_backoff: Self::DEFAULT_QUERY_RETRY_BACKOFF,
    }
  }
}

/// Ingests `[min_id, max_id]` from a source into a store.
pub struct Pipeline<S, F> {
  store:   Arc<S>,
  source:  Arc<F>,
  config:  PipelineConfig,
  batches: Batches,
  cancel:  CancellationToken,
}

impl<S, F> Pipeline<S, F>
where
  S: ItemStore + 'static,
  F: ItemSource + 'static,
{
  pub fn new(
    store: Arc<S>,
    source: Arc<F>,
    config: PipelineConfig,
  ) -> Result<Self, ConfigError> {
    if config.concurrency == 0 {
      return Err(ConfigError::invalid("concurrency", "must be at least 1"));
    }
    let batches = partition(config.min_id, config.max_id, config.batch_size)?;
    Ok(Self {
      store,
      source,
      config,
      batches,
      cancel: CancellationToken::new(),
    })
  }

  /// Use `cancel` instead of the pipeline's own token, e.g. to share one
  /// shutdown signal between several components.
  pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
    self.cancel = cancel;
    self
  }

  /// Cancelling this token stops the run: no further batch is started and
  /// running workers stop before their next id. In-flight items finish.
  pub fn cancel_token(&self) -> CancellationToken { self.cancel.clone() }

  /// Run every batch and wait for all of them. Batches are started in order;
  /// a new one starts only once fewer than `concurrency` are running.
  pub async fn run(&self) -> RunSummary {
    let started_at = Instant::now();
    let mut batches = self.batches.clone();
    info!(
      min_id = self.config.min_id,
      max_id = self.config.max_id,
      batches = batches.remaining(),
      concurrency = self.config.concurrency,
      "ingestion started"
    );

    let mut tasks = JoinSet::new();
    let mut running: HashMap<tokio::task::Id, Batch> = HashMap::new();
    let mut reports = Vec::new();
    let mut not_started = 0;

    while let Some(batch) = batches.next() {
      while tasks.len() >= self.config.concurrency {
        if let Some(joined) = tasks.join_next_with_id().await {
          reports.push(collect(joined, &mut running));
        }
      }

      if self.cancel.is_cancelled() {
        not_started = 1 + batches.remaining();
        warn!(not_started, "run cancelled; remaining batches skipped");
        break;
      }

      let store = Arc::clone(&self.store);
      let source = Arc::clone(&self.source);
      let cancel = self.cancel.clone();
      let backoff = self.config.query_retry_backoff;
      let handle = tasks.spawn(async move {
        worker::run_batch(batch, store.as_ref(), source.as_ref(), backoff, &cancel).await
      });
      running.insert(handle.id(), batch);
    }

    while let Some(joined) = tasks.join_next_with_id().await {
      reports.push(collect(joined, &mut running));
    }

    reports.sort_by_key(|r| r.batch.start);
    let summary = RunSummary {
      batches: reports,
      not_started,
      elapsed: started_at.elapsed(),
    };
    let tally = summary.tally();
    info!(
      inserted = tally.inserted,
      already_present = tally.already_present,
      duplicates = tally.duplicates,
      missing = tally.missing,
      failed = summary.failed_count(),
      "ingestion finished"
    );
    summary
  }
}

fn collect(
  joined: Result<(tokio::task::Id, BatchReport), tokio::task::JoinError>,
  running: &mut HashMap<tokio::task::Id, Batch>,
) -> BatchReport {
  match joined {
    Ok((id, report)) => {
      running.remove(&id);
      report
    }
    Err(join_error) => {
      let batch = running
        .remove(&join_error.id())
        .unwrap_or(Batch { start: 0, end: 0 });
      error!(
        start = batch.start,
        end = batch.end,
        error = %join_error,
        "batch worker panicked"
      );
      BatchReport::panicked(batch, join_error.to_string())
    }
  }
}
