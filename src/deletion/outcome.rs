use std::fmt;

use crate::error::TransportError;
use crate::models::FilteredMessage;

/// Status Discord returns for a successful delete
pub const STATUS_NO_CONTENT: u16 = 204;
/// Status for a message that no longer exists; counted as deleted
pub const STATUS_NOT_FOUND: u16 = 404;

/// Coarse result of one delete call, used for counting and display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Deleted,
    Failed,
}

/// What happened to one delete call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// 204, or 404 for a message that was already gone
    Deleted { status: u16 },
    /// Any other status; never retried
    Rejected { status: u16 },
    /// No status at all (connect failure, timeout)
    Transport(TransportError),
}

impl DeleteOutcome {
    pub fn from_response(response: Result<u16, TransportError>) -> Self {
        match response {
            Ok(status @ (STATUS_NO_CONTENT | STATUS_NOT_FOUND)) => DeleteOutcome::Deleted { status },
            Ok(status) => DeleteOutcome::Rejected { status },
            Err(err) => DeleteOutcome::Transport(err),
        }
    }

    pub fn classification(&self) -> Classification {
        match self {
            DeleteOutcome::Deleted { .. } => Classification::Deleted,
            DeleteOutcome::Rejected { .. } | DeleteOutcome::Transport(_) => Classification::Failed,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.classification() == Classification::Deleted
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            DeleteOutcome::Deleted { status } | DeleteOutcome::Rejected { status } => Some(*status),
            DeleteOutcome::Transport(_) => None,
        }
    }
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteOutcome::Deleted { status: STATUS_NOT_FOUND } => write!(f, "already deleted (404)"),
            DeleteOutcome::Deleted { status } => write!(f, "deleted ({})", status),
            DeleteOutcome::Rejected { status } => write!(f, "failed with status {}", status),
            DeleteOutcome::Transport(err) => write!(f, "failed: {}", err),
        }
    }
}

/// Per-item event emitted as each delete settles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub item: FilteredMessage,
    /// Zero-based batch the item was dispatched in
    pub batch_index: usize,
    pub outcome: DeleteOutcome,
}

impl ItemOutcome {
    pub fn classification(&self) -> Classification {
        self.outcome.classification()
    }
}

/// Summary of one deletion job
///
/// When the job ran to completion `deleted + failed == total`. A cancelled or
/// aborted job only counts the batches that were dispatched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobResult {
    /// Items handed to the job
    pub total: usize,
    /// Items whose delete call settled
    pub processed: usize,
    pub deleted: usize,
    /// Rejected plus transport failures
    pub failed: usize,
    /// Subset of `failed` that never got a status code
    pub transport_failures: usize,
    /// Batches dispatched
    pub batches: usize,
    pub cancelled: bool,
    /// Set when a malformed item stopped the job early
    pub aborted: Option<String>,
}

impl JobResult {
    pub fn new(total: usize) -> Self {
        Self { total, ..Self::default() }
    }

    pub(crate) fn record(&mut self, outcome: &DeleteOutcome) {
        self.processed += 1;
        match outcome {
            DeleteOutcome::Deleted { .. } => self.deleted += 1,
            DeleteOutcome::Rejected { .. } => self.failed += 1,
            DeleteOutcome::Transport(_) => {
                self.failed += 1;
                self.transport_failures += 1;
            }
        }
    }

    /// Every item was processed without cancellation or abort
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.aborted.is_none() && self.processed == self.total
    }

    pub fn remaining(&self) -> usize {
        self.total - self.processed
    }
}
