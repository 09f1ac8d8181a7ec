//! Splitting an id range into batches.

use std::ops::RangeInclusive;

use harvest_core::ConfigError;

/// A contiguous, inclusive id range handled by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Batch {
  pub start: i64,
  pub end:   i64,
}

impl Batch {
  pub fn ids(&self) -> RangeInclusive<i64> { self.start..=self.end }

  pub fn id_count(&self) -> u64 { (self.end - self.start) as u64 + 1 }
}

/// Lazily yields the batches of `[min_id, max_id]` in increasing order.
#[derive(Debug, Clone)]
pub struct Batches {
  next:       Option<i64>,
  max_id:     i64,
  batch_size: u64,
}

/// Split `[min_id, max_id]` into batches of `batch_size` ids; the last batch
/// may be shorter. Batches are disjoint and cover the range exactly.
pub fn partition(
  min_id: i64,
  max_id: i64,
  batch_size: u64,
) -> Result<Batches, ConfigError> {
  if min_id < 1 {
    return Err(ConfigError::invalid("min_id", format!("{min_id} is not positive")));
  }
  if max_id < min_id {
    return Err(ConfigError::invalid(
      "max_id",
      format!("{max_id} is below min_id {min_id}"),
    ));
  }
  if batch_size == 0 {
    return Err(ConfigError::invalid("batch_size", "must be at least 1"));
  }

  Ok(Batches {
    next: Some(min_id),
    max_id,
    batch_size,
  })
}

impl Iterator for Batches {
  type Item = Batch;

  fn next(&mut self) -> Option<Batch> {
    let start = self.next?;
    let span = i64::try_from(self.batch_size - 1).unwrap_or(i64::MAX);
    let end = start.saturating_add(span).min(self.max_id);
    self.next = (end < self.max_id).then(|| end + 1);
    Some(Batch { start, end })
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let n = self.remaining();
    match usize::try_from(n) {
      Ok(n) => (n, Some(n)),
      Err(_) => (usize::MAX, None),
    }
  }
}

impl Batches {
  /// Number of batches not yet yielded.
  pub fn remaining(&self) -> u64 {
    let Some(next) = self.next else {
      return 0;
    };
    let ids = (self.max_id as i128 - next as i128 + 1) as u128;
    ids.div_ceil(self.batch_size as u128) as u64
  }
}
