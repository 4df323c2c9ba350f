//! Data model for a loaded Discord export.
//!
//! - [`Message`] - A single message from a channel's `messages.json`
//! - [`DirectConversation`] / [`GroupConversation`] - The two conversation shapes,
//!   unified by the [`Conversation`] trait
//! - [`Backup`] - Every conversation from one export, loaded atomically
//! - [`FilteredMessage`] - A message plus its owning conversation id, the unit
//!   a deletion job operates on
//!
//! Messages are shared behind `Arc` so filter results and deletion jobs can
//! hold them without cloning message contents.

pub mod backup;
pub mod conversation;
pub mod filtered;
pub mod message;

pub use backup::Backup;
pub use conversation::{Conversation, ConversationKind, DirectConversation, GroupConversation};
pub use filtered::{FilteredMessage, FilteredMessages};
pub use message::Message;
