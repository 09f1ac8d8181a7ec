//! The Harvest ingestion pipeline.
//!
//! [`partition`] splits an inclusive id range into fixed-size batches.
//! [`Pipeline`] runs one [`worker`] per batch on a bounded pool of tokio
//! tasks, joins them all, and returns a [`RunSummary`]. Each worker walks its
//! batch in order: existence check, fetch, coerce, insert. Per-item failures
//! are recorded and never abort the run.

pub mod error;
pub mod partition;
pub mod pipeline;
pub mod report;
pub mod worker;

pub use error::IngestError;
pub use partition::{Batch, Batches, partition};
pub use pipeline::{Pipeline, PipelineConfig};
pub use report::{BatchReport, BatchStatus, ItemFailure, RunSummary, Tally};
