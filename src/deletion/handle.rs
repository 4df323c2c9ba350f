//! Caller-owned handle to a running deletion job.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::cancel::CancelToken;
use super::observer::JobObserver;
use super::orchestrator::DeletionOrchestrator;
use super::outcome::{ItemOutcome, JobResult};
use crate::client::Credential;
use crate::error::JobError;
use crate::models::FilteredMessage;

/// Lifecycle of one job; `Completed` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Running { batch_index: usize },
    Cancelling,
    Completed,
}

impl JobState {
    pub fn is_active(&self) -> bool {
        matches!(self, JobState::Running { .. } | JobState::Cancelling)
    }
}

/// Snapshot of a job's progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobProgress {
    pub state: JobState,
    /// Items settled so far; grows by whole batches
    pub completed: usize,
    /// Fixed when the job starts
    pub total: usize,
    /// Most recent item to settle, for display
    pub last_outcome: Option<ItemOutcome>,
}

impl JobProgress {
    fn idle(total: usize) -> Self {
        Self { state: JobState::Idle, completed: 0, total, last_outcome: None }
    }

    /// Completed share in `0.0..=1.0`; an empty job counts as done
    pub fn fraction(&self) -> f64 {
        if self.total == 0 { 1.0 } else { self.completed as f64 / self.total as f64 }
    }
}

/// Per-item outcomes of one job, in the order they settled
///
/// Ends when the job ends. Can be taken from the handle only once.
pub struct OutcomeStream {
    rx: mpsc::UnboundedReceiver<ItemOutcome>,
}

impl OutcomeStream {
    pub async fn next(&mut self) -> Option<ItemOutcome> {
        self.rx.recv().await
    }
}

impl Stream for OutcomeStream {
    type Item = ItemOutcome;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Publishes job events into the handle's channels
struct ChannelObserver {
    progress: watch::Sender<JobProgress>,
    outcomes: mpsc::UnboundedSender<ItemOutcome>,
}

impl JobObserver for ChannelObserver {
    fn on_batch_start(&self, batch_index: usize, _batch_len: usize) {
        self.progress.send_modify(|p| p.state = JobState::Running { batch_index });
    }

    fn on_item_outcome(&self, outcome: &ItemOutcome) {
        self.progress.send_modify(|p| p.last_outcome = Some(outcome.clone()));
        // Nobody listening is fine; progress still carries the last outcome
        let _ = self.outcomes.send(outcome.clone());
    }

    fn on_progress(&self, completed: usize, _total: usize) {
        self.progress.send_modify(|p| p.completed = completed);
    }

    fn on_cancelling(&self) {
        self.progress.send_modify(|p| p.state = JobState::Cancelling);
    }

    fn on_job_end(&self, _result: &JobResult) {
        self.progress.send_modify(|p| p.state = JobState::Completed);
    }
}

/// Handle to a job started with [`DeletionOrchestrator::start`]
///
/// Dropping the handle before calling [`result`](Self::result) cancels the
/// job at its next batch boundary.
pub struct JobHandle {
    cancel: CancelToken,
    progress: watch::Receiver<JobProgress>,
    outcomes: Option<OutcomeStream>,
    task: Option<JoinHandle<JobResult>>,
}

impl JobHandle {
    /// Current progress snapshot
    pub fn progress(&self) -> JobProgress {
        self.progress.borrow().clone()
    }

    /// Receiver notified whenever progress changes
    pub fn watch_progress(&self) -> watch::Receiver<JobProgress> {
        self.progress.clone()
    }

    /// Take the per-item outcome stream; `None` after the first call
    pub fn outcomes(&mut self) -> Option<OutcomeStream> {
        self.outcomes.take()
    }

    /// Request a cooperative stop; the current batch still finishes
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }

    /// Wait for the job to end and return its summary
    ///
    /// Cancelled jobs return their partial result. Only the first call gets it.
    pub async fn result(&mut self) -> Result<JobResult, JobError> {
        let task = self.task.take().ok_or(JobError::ResultTaken)?;
        task.await.map_err(|e| JobError::Panicked(e.to_string()))
    }
}

impl Drop for JobHandle {
    fn drop(&mut self) {
        if self.task.as_ref().is_some_and(|task| !task.is_finished()) {
            self.cancel.cancel();
        }
    }
}

impl DeletionOrchestrator {
    /// Spawn a job over `items` on the current tokio runtime
    ///
    /// The job owns `items` for its whole run, so later changes to the backup
    /// or filter never affect it.
    pub fn start(&self, items: Vec<FilteredMessage>, credential: Credential) -> JobHandle {
        let cancel = CancelToken::new();
        let (progress_tx, progress_rx) = watch::channel(JobProgress::idle(items.len()));
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        let orchestrator = self.clone();
        let job_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            let observer = ChannelObserver { progress: progress_tx, outcomes: outcome_tx };
            orchestrator.run(&items, &credential, &job_cancel, &observer).await
        });

        JobHandle {
            cancel,
            progress: progress_rx,
            outcomes: Some(OutcomeStream { rx: outcome_rx }),
            task: Some(task),
        }
    }
}
