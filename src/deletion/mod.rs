//! Bulk deletion of filtered messages.
//!
//! - [`DeletionOrchestrator`] - Batches items, paces batches, classifies outcomes
//! - [`JobHandle`] - Caller-owned view of a spawned job: progress, outcomes,
//!   cancellation and the final [`JobResult`]
//! - [`JobObserver`] - Event hooks for callers driving [`DeletionOrchestrator::run`] directly
//!
//! A job never retries and never stops on a failed item. Only cancellation or a
//! malformed item ends it early, and both still return the partial result.

pub mod cancel;
pub mod handle;
pub mod observer;
pub mod orchestrator;
pub mod outcome;

pub use cancel::CancelToken;
pub use handle::{JobHandle, JobProgress, JobState, OutcomeStream};
pub use observer::{JobObserver, SilentObserver};
pub use orchestrator::{DEFAULT_BATCH_DELAY, DEFAULT_BATCH_SIZE, DeletionOrchestrator, JobConfig};
pub use outcome::{Classification, DeleteOutcome, ItemOutcome, JobResult};
