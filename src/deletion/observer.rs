use super::outcome::{ItemOutcome, JobResult};

/// Receives job events as they happen.
///
/// The job handle implements this over channels; tests and embedders can
/// implement it directly. All methods have default no-op implementations.
pub trait JobObserver: Send + Sync {
    fn on_job_start(&self, _total: usize) {}
    fn on_batch_start(&self, _batch_index: usize, _batch_len: usize) {}
    /// One call per item, in the order items settle within their batch
    fn on_item_outcome(&self, _outcome: &ItemOutcome) {}
    /// After every batch; `completed` counts every settled item
    fn on_progress(&self, _completed: usize, _total: usize) {}
    fn on_cancelling(&self) {}
    fn on_job_end(&self, _result: &JobResult) {}
}

/// No-op observer for silent operation.
pub struct SilentObserver;

impl JobObserver for SilentObserver {}
