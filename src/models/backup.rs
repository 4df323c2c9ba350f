use chrono::{DateTime, Utc};

use super::conversation::{Conversation, DirectConversation, GroupConversation};

/// In-memory snapshot of every conversation loaded from one export
///
/// A backup is never edited in place. After a deletion run the caller loads a
/// fresh one from the export reader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backup {
    pub direct: Vec<DirectConversation>,
    pub groups: Vec<GroupConversation>,
}

impl Backup {
    pub fn new(direct: Vec<DirectConversation>, groups: Vec<GroupConversation>) -> Self {
        Self { direct, groups }
    }

    pub fn direct_message_count(&self) -> usize {
        self.direct.iter().map(|c| c.messages.len()).sum()
    }

    pub fn group_message_count(&self) -> usize {
        self.groups.iter().map(|c| c.messages.len()).sum()
    }

    pub fn message_count(&self) -> usize {
        self.direct_message_count() + self.group_message_count()
    }

    pub fn is_empty(&self) -> bool {
        self.message_count() == 0
    }

    /// Every conversation, direct ones first, in load order
    pub fn conversations(&self) -> impl Iterator<Item = &dyn Conversation> {
        self.direct
            .iter()
            .map(|c| c as &dyn Conversation)
            .chain(self.groups.iter().map(|c| c as &dyn Conversation))
    }

    /// Oldest and newest message timestamps across the whole backup
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut timestamps =
            self.conversations().flat_map(|c| c.messages().iter().map(|m| m.timestamp));
        let first = timestamps.next()?;
        Some(timestamps.fold((first, first), |(oldest, newest), ts| (oldest.min(ts), newest.max(ts))))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;

    use super::*;
    use crate::models::Message;

    fn message(id: &str, secs: i64) -> Arc<Message> {
        Arc::new(Message {
            id: id.to_string(),
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            contents: format!("message {}", id),
            attachments: None,
        })
    }

    fn sample_backup() -> Backup {
        Backup::new(
            vec![DirectConversation {
                id: "d1".to_string(),
                recipient_id: "100".to_string(),
                recipient_name: "alice".to_string(),
                messages: vec![message("1", 300), message("2", 100)],
            }],
            vec![GroupConversation { id: "g1".to_string(), messages: vec![message("3", 500)] }],
        )
    }

    #[test]
    fn test_message_counts() {
        let backup = sample_backup();
        assert_eq!(backup.direct_message_count(), 2);
        assert_eq!(backup.group_message_count(), 1);
        assert_eq!(backup.message_count(), 3);
        assert!(!backup.is_empty());
    }

    #[test]
    fn test_conversations_direct_first() {
        let backup = sample_backup();
        let ids: Vec<&str> = backup.conversations().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["d1", "g1"]);
    }

    #[test]
    fn test_time_span() {
        let backup = sample_backup();
        let (oldest, newest) = backup.time_span().unwrap();
        assert_eq!(oldest, Utc.timestamp_opt(100, 0).unwrap());
        assert_eq!(newest, Utc.timestamp_opt(500, 0).unwrap());
    }

    #[test]
    fn test_empty_backup() {
        let backup = Backup::default();
        assert!(backup.is_empty());
        assert!(backup.time_span().is_none());
    }
}
