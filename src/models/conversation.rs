use std::sync::Arc;

use super::message::Message;

/// Which collection of the backup a conversation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversationKind {
    Direct,
    Group,
}

/// Common view over direct and group conversations
///
/// The filter engine only needs the owning id and the ordered messages, so it
/// works against this trait instead of matching on the two concrete shapes.
pub trait Conversation {
    fn id(&self) -> &str;
    fn messages(&self) -> &[Arc<Message>];
}

/// One-to-one conversation with another user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectConversation {
    pub id: String,
    pub recipient_id: String,
    pub recipient_name: String,
    pub messages: Vec<Arc<Message>>,
}

/// Server channel, thread or group DM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupConversation {
    pub id: String,
    pub messages: Vec<Arc<Message>>,
}

impl Conversation for DirectConversation {
    fn id(&self) -> &str {
        &self.id
    }

    fn messages(&self) -> &[Arc<Message>] {
        &self.messages
    }
}

impl Conversation for GroupConversation {
    fn id(&self) -> &str {
        &self.id
    }

    fn messages(&self) -> &[Arc<Message>] {
        &self.messages
    }
}
