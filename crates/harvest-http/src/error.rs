//! Error type for `harvest-http`.

use harvest_core::ConfigError;
use thiserror::Error;

/// Raised while building an [`HttpSource`](crate::HttpSource). Per-request
/// failures are [`harvest_core::FetchError`]s instead.
#[derive(Debug, Error)]
pub enum Error {
  #[error("configuration error: {0}")]
  Config(#[from] ConfigError),

  #[error("failed to build HTTP client: {0}")]
  Client(#[from] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
