//! HTTP item source for Harvest.
//!
//! [`HttpSource`] implements [`harvest_core::source::ItemSource`] over
//! `reqwest`. It performs exactly one GET per call; retrying is the caller's
//! business.

mod source;

pub mod error;

pub use error::{Error, Result};
pub use source::{DEFAULT_ITEM_BASE_URL, HttpSource, SourceConfig};
