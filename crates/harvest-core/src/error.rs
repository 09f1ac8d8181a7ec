//! Error taxonomy shared by every Harvest crate.
//!
//! Backends keep their own error types and convert into these at the trait
//! boundary, so the pipeline can decide per item whether a failure is fatal,
//! retryable, recorded, or benign.

use thiserror::Error;

/// Type-erased source error carried across crate boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Missing or invalid configuration. Always fatal, always before any work.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("missing required setting: {0}")]
  Missing(&'static str),

  #[error("invalid {field}: {reason}")]
  Invalid {
    field:  &'static str,
    reason: String,
  },
}

impl ConfigError {
  pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
    Self::Invalid {
      field,
      reason: reason.into(),
    }
  }
}

/// Failure to obtain one item from the remote API.
#[derive(Debug, Error)]
pub enum FetchError {
  /// Connection refused, timeout, DNS, or a body that could not be read.
  #[error("transport error fetching {url}: {source}")]
  Transport {
    url:    String,
    #[source]
    source: BoxError,
  },

  /// Any status other than 200.
  #[error("bad response from {url}: HTTP {status}")]
  BadResponse { url: String, status: u16 },

  /// A 200 whose body is not an item.
  #[error("malformed response from {url}: {reason}")]
  Malformed { url: String, reason: String },

  /// A record came back under a different id than the one asked for.
  #[error("response id {received} does not match requested id {requested}")]
  IdMismatch { requested: i64, received: i64 },
}

/// The existence check could not be answered.
#[derive(Debug, Error)]
#[error("existence check failed: {0}")]
pub struct QueryError(#[source] pub BoxError);

impl QueryError {
  pub fn new(source: impl Into<BoxError>) -> Self { Self(source.into()) }
}

/// Failure to insert one row.
#[derive(Debug, Error)]
pub enum StoreError {
  /// A row with this id already exists. Expected when two workers race past
  /// the existence check; treated as a duplicate skip.
  #[error("item {0} is already stored")]
  Conflict(i64),

  #[error("store error: {0}")]
  Other(#[source] BoxError),
}

impl StoreError {
  pub fn other(source: impl Into<BoxError>) -> Self { Self::Other(source.into()) }

  pub fn is_conflict(&self) -> bool { matches!(self, Self::Conflict(_)) }
}
