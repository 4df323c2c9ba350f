//! Batch sequencer for bulk deletion.
//!
//! Items are split into fixed-size batches in input order. Each batch is
//! dispatched concurrently and must fully settle before the job pauses for
//! `batch_delay` and moves on. This pacing is what keeps the job inside
//! Discord's rate limits; failed or rejected deletes never shorten it.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use super::cancel::CancelToken;
use super::observer::JobObserver;
use super::outcome::{DeleteOutcome, ItemOutcome, JobResult};
use crate::client::{Credential, DeleteClient};
use crate::models::FilteredMessage;

/// Deletes dispatched together before the next pause
pub const DEFAULT_BATCH_SIZE: usize = 2;
/// Pause between two batches
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobConfig {
    pub batch_size: usize,
    pub batch_delay: Duration,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self { batch_size: DEFAULT_BATCH_SIZE, batch_delay: DEFAULT_BATCH_DELAY }
    }
}

impl JobConfig {
    /// Number of batches a job over `items` items dispatches when it runs to completion
    pub fn batch_count(&self, items: usize) -> usize {
        items.div_ceil(self.batch_size)
    }
}

/// Runs deletion jobs against a [`DeleteClient`]
///
/// Holds no per-job state; every call to [`run`](Self::run) or
/// [`start`](Self::start) is independent.
#[derive(Clone)]
pub struct DeletionOrchestrator {
    client: Arc<dyn DeleteClient>,
    config: JobConfig,
}

impl DeletionOrchestrator {
    pub fn new(client: Arc<dyn DeleteClient>) -> Self {
        Self { client, config: JobConfig::default() }
    }

    /// Override batch size and delay. A zero batch size is treated as one.
    pub fn with_config(mut self, config: JobConfig) -> Self {
        self.config = JobConfig { batch_size: config.batch_size.max(1), ..config };
        self
    }

    pub fn config(&self) -> JobConfig {
        self.config
    }

    /// Delete every item, one remote call each, and summarize the outcome
    ///
    /// Per-item failures are counted and never stop the job. `cancel` is checked
    /// before each batch is dispatched; once it is set the job ends with the
    /// batches already dispatched. A malformed item ends the job before the
    /// batch containing it.
    pub async fn run(
        &self,
        items: &[FilteredMessage],
        credential: &Credential,
        cancel: &CancelToken,
        observer: &dyn JobObserver,
    ) -> JobResult {
        let total = items.len();
        let mut result = JobResult::new(total);
        let batch_count = self.config.batch_count(total);

        info!(total, batches = batch_count, batch_size = self.config.batch_size, "starting deletion job");
        observer.on_job_start(total);

        for (batch_index, batch) in items.chunks(self.config.batch_size).enumerate() {
            if batch_index > 0 && !cancel.is_cancelled() {
                tokio::time::sleep(self.config.batch_delay).await;
            }

            if cancel.is_cancelled() {
                info!(processed = result.processed, total, "deletion job cancelled");
                result.cancelled = true;
                observer.on_cancelling();
                break;
            }

            if let Some(reason) = find_malformed(batch) {
                warn!(batch_index, %reason, "aborting deletion job");
                result.aborted = Some(reason);
                break;
            }

            observer.on_batch_start(batch_index, batch.len());
            let outcomes = join_all(
                batch.iter().map(|item| self.delete_one(item, credential, batch_index, observer)),
            )
            .await;

            for outcome in &outcomes {
                result.record(outcome);
            }
            result.batches += 1;

            debug!(
                batch = batch_index + 1,
                of = batch_count,
                processed = result.processed,
                deleted = result.deleted,
                failed = result.failed,
                "batch settled"
            );
            observer.on_progress(result.processed, total);
        }

        info!(
            deleted = result.deleted,
            failed = result.failed,
            processed = result.processed,
            total,
            "deletion job finished"
        );
        observer.on_job_end(&result);

        result
    }

    async fn delete_one(
        &self,
        item: &FilteredMessage,
        credential: &Credential,
        batch_index: usize,
        observer: &dyn JobObserver,
    ) -> DeleteOutcome {
        let response =
            self.client.delete_message(credential, &item.conversation_id, item.message_id()).await;
        let outcome = DeleteOutcome::from_response(response);

        if !outcome.is_deleted() {
            warn!(
                conversation_id = %item.conversation_id,
                message_id = item.message_id(),
                %outcome,
                "message not deleted"
            );
        }

        observer.on_item_outcome(&ItemOutcome {
            item: item.clone(),
            batch_index,
            outcome: outcome.clone(),
        });

        outcome
    }
}

/// First item in `batch` that cannot be addressed by a delete call
fn find_malformed(batch: &[FilteredMessage]) -> Option<String> {
    batch.iter().find_map(|item| {
        if item.conversation_id.trim().is_empty() {
            Some(format!("message {} has no conversation id", item.message_id()))
        } else if item.message_id().trim().is_empty() {
            Some(format!("message in conversation {} has no id", item.conversation_id))
        } else {
            None
        }
    })
}
