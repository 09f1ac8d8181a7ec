//! Per-batch and per-run outcome reporting.

use std::{fmt, ops::AddAssign, time::Duration};

use crate::{IngestError, partition::Batch};

/// Per-item outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
  /// Fetched and stored by this run.
  pub inserted:        u64,
  /// Skipped by the existence check.
  pub already_present: u64,
  /// Lost the insert race to another worker; benign.
  pub duplicates:      u64,
  /// The source has no item under the id.
  pub missing:         u64,
}

impl AddAssign for Tally {
  fn add_assign(&mut self, rhs: Self) {
    self.inserted += rhs.inserted;
    self.already_present += rhs.already_present;
    self.duplicates += rhs.duplicates;
    self.missing += rhs.missing;
  }
}

/// One id that could not be ingested.
#[derive(Debug)]
pub struct ItemFailure {
  pub id:    i64,
  pub error: IngestError,
}

/// How a batch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
  /// Every id in the batch was attempted.
  Completed,
  /// The run was cancelled; ids from `next_id` on were not attempted.
  Cancelled { next_id: i64 },
  /// The worker task panicked; its counts are lost.
  Panicked(String),
}

/// What one worker did with its batch.
#[derive(Debug)]
pub struct BatchReport {
  pub batch:    Batch,
  pub status:   BatchStatus,
  pub tally:    Tally,
  pub failures: Vec<ItemFailure>,
}

impl BatchReport {
  pub fn new(batch: Batch) -> Self {
    Self {
      batch,
      status: BatchStatus::Completed,
      tally: Tally::default(),
      failures: Vec::new(),
    }
  }

  pub fn panicked(batch: Batch, message: String) -> Self {
    Self {
      status: BatchStatus::Panicked(message),
      ..Self::new(batch)
    }
  }

  pub fn is_clean(&self) -> bool {
    self.status == BatchStatus::Completed && self.failures.is_empty()
  }
}

/// The aggregated result of a whole run. Only produced after every worker
/// has been joined.
#[derive(Debug, Default)]
pub struct RunSummary {
  /// Reports of every batch that was started, ordered by batch start.
  pub batches:     Vec<BatchReport>,
  /// Batches never started because the run was cancelled first.
  pub not_started: u64,
  pub elapsed:     Duration,
}

impl RunSummary {
  pub fn tally(&self) -> Tally {
    let mut total = Tally::default();
    for report in &self.batches {
      total += report.tally;
    }
    total
  }

  pub fn failures(&self) -> impl Iterator<Item = &ItemFailure> {
    self.batches.iter().flat_map(|b| b.failures.iter())
  }

  pub fn failed_count(&self) -> usize {
    self.batches.iter().map(|b| b.failures.len()).sum()
  }

  pub fn cancelled_count(&self) -> usize {
    self
      .batches
      .iter()
      .filter(|b| matches!(b.status, BatchStatus::Cancelled { .. }))
      .count()
  }

  pub fn panicked(&self) -> impl Iterator<Item = &BatchReport> {
    self
      .batches
      .iter()
      .filter(|b| matches!(b.status, BatchStatus::Panicked(_)))
  }

  /// True only if every batch ran to completion with no failed ids.
  pub fn is_success(&self) -> bool {
    self.not_started == 0 && self.batches.iter().all(BatchReport::is_clean)
  }
}

impl fmt::Display for RunSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let tally = self.tally();
    writeln!(
      f,
      "batches: {} started, {} cancelled, {} not started ({:.1?})",
      self.batches.len(),
      self.cancelled_count(),
      self.not_started,
      self.elapsed,
    )?;
    writeln!(f, "inserted:        {}", tally.inserted)?;
    writeln!(f, "already present: {}", tally.already_present)?;
    writeln!(f, "duplicates:      {}", tally.duplicates)?;
    writeln!(f, "missing:         {}", tally.missing)?;
    writeln!(f, "failed:          {}", self.failed_count())?;

    for failure in self.failures() {
      writeln!(f, "  {}: {}", failure.id, failure.error)?;
    }
    for report in self.panicked() {
      if let BatchStatus::Panicked(message) = &report.status {
        writeln!(
          f,
          "  batch {}..={} panicked: {message}",
          report.batch.start, report.batch.end
        )?;
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use harvest_core::FetchError;

  use super::*;

  fn batch(start: i64, end: i64) -> Batch { Batch { start, end } }

  #[test]
  fn clean_run_is_success() {
    let mut a = BatchReport::new(batch(1, 10));
    a.tally.inserted = 10;
    let summary = RunSummary {
      batches: vec![a],
      ..RunSummary::default()
    };
    assert!(summary.is_success());
  }

  #[test]
  fn any_failure_is_not_success() {
    let mut a = BatchReport::new(batch(1, 3));
    a.tally.inserted = 2;
    a.failures.push(ItemFailure {
      id:    3,
      error: IngestError::Fetch(FetchError::BadResponse {
        url:    "http://example.test/3.json".into(),
        status: 500,
      }),
    });
    let summary = RunSummary {
      batches: vec![a],
      ..RunSummary::default()
    };

    assert!(!summary.is_success());
    assert_eq!(summary.failed_count(), 1);
    assert_eq!(summary.failures().next().unwrap().id, 3);

    let text = summary.to_string();
    assert!(text.contains("inserted:        2"), "{text}");
    assert!(text.contains("failed:          1"), "{text}");
    assert!(text.contains("  3: bad response from http://example.test/3.json: HTTP 500"), "{text}");
  }

  #[test]
  fn cancellation_and_panics_are_not_success() {
    let cancelled = RunSummary {
      batches: vec![BatchReport {
        status: BatchStatus::Cancelled { next_id: 5 },
        ..BatchReport::new(batch(1, 10))
      }],
      ..RunSummary::default()
    };
    assert!(!cancelled.is_success());
    assert_eq!(cancelled.cancelled_count(), 1);

    let not_started = RunSummary {
      not_started: 2,
      ..RunSummary::default()
    };
    assert!(!not_started.is_success());

    let panicked = RunSummary {
      batches: vec![BatchReport::panicked(batch(1, 2), "boom".into())],
      ..RunSummary::default()
    };
    assert!(!panicked.is_success());
    assert!(panicked.to_string().contains("batch 1..=2 panicked: boom"));
  }

  #[test]
  fn tallies_add_up_across_batches() {
    let mut a = BatchReport::new(batch(1, 2));
    a.tally = Tally { inserted: 1, already_present: 1, duplicates: 0, missing: 0 };
    let mut b = BatchReport::new(batch(3, 4));
    b.tally = Tally { inserted: 0, already_present: 0, duplicates: 1, missing: 1 };

    let summary = RunSummary {
      batches: vec![a, b],
      ..RunSummary::default()
    };
    assert_eq!(
      summary.tally(),
      Tally { inserted: 1, already_present: 1, duplicates: 1, missing: 1 }
    );
  }
}
