use std::sync::Arc;

use super::message::Message;

/// A message paired with the id of the conversation that owns it
///
/// This is the unit a deletion job works on. Both fields are shared with the
/// backup, so cloning never copies message contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredMessage {
    pub conversation_id: Arc<str>,
    pub message: Arc<Message>,
}

impl FilteredMessage {
    pub fn new(conversation_id: Arc<str>, message: Arc<Message>) -> Self {
        Self { conversation_id, message }
    }

    pub fn message_id(&self) -> &str {
        &self.message.id
    }

    pub fn contents(&self) -> &str {
        &self.message.contents
    }
}

/// Output of one filter pass, split by collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredMessages {
    pub direct: Vec<FilteredMessage>,
    pub groups: Vec<FilteredMessage>,
}

impl FilteredMessages {
    pub fn len(&self) -> usize {
        self.direct.len() + self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.groups.is_empty()
    }

    /// Flatten into the order a deletion job processes items: direct, then group
    pub fn into_deletion_order(self) -> Vec<FilteredMessage> {
        let mut items = self.direct;
        items.extend(self.groups);
        items
    }
}
