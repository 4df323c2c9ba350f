//! Ledger file format and in-memory lookup

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// One deleted message as written to `deleted_messages.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedMessage {
    pub channel_id: String,
    pub message_id: String,
}

/// On-disk shape of the ledger
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerFile {
    #[serde(default)]
    pub deleted_messages: Vec<DeletedMessage>,
}

/// Record of messages already removed from Discord
///
/// Message ids are only unique within a channel, so lookups are keyed by
/// channel first.
#[derive(Debug, Clone, Default)]
pub struct DeletionLedger {
    by_channel: HashMap<String, HashSet<String>>,
    entries: Vec<DeletedMessage>,
}

impl DeletionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(file: LedgerFile) -> Self {
        let mut ledger = Self::new();
        for entry in file.deleted_messages {
            ledger.record(&entry.channel_id, &entry.message_id);
        }
        ledger
    }

    pub fn to_file(&self) -> LedgerFile {
        LedgerFile { deleted_messages: self.entries.clone() }
    }

    /// Record a deletion; returns false if it was already recorded
    pub fn record(&mut self, channel_id: &str, message_id: &str) -> bool {
        let inserted = self
            .by_channel
            .entry(channel_id.to_string())
            .or_default()
            .insert(message_id.to_string());
        if inserted {
            self.entries.push(DeletedMessage {
                channel_id: channel_id.to_string(),
                message_id: message_id.to_string(),
            });
        }
        inserted
    }

    pub fn contains(&self, channel_id: &str, message_id: &str) -> bool {
        self.by_channel.get(channel_id).is_some_and(|ids| ids.contains(message_id))
    }

    /// Deleted message ids for one channel, if any were recorded
    pub fn channel(&self, channel_id: &str) -> Option<&HashSet<String>> {
        self.by_channel.get(channel_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
