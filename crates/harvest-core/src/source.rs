//! The `ItemSource` trait: where items come from.

use std::future::Future;

use crate::{FetchError, item::Item};

/// Fetches single items by id.
///
/// `Ok(None)` means the source answered but has no item under that id.
/// Implementations do not retry.
pub trait ItemSource: Send + Sync {
  fn fetch(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Item>, FetchError>> + Send + '_;
}
