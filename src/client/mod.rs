//! Remote side: token check and message deletion against Discord's HTTP API.
//!
//! The deletion job only depends on the [`DeleteClient`] trait, so tests drive it
//! with scripted clients and the CLI plugs in [`DiscordClient`].

pub mod credential;
pub mod discord;

use async_trait::async_trait;

pub use credential::{Credential, Identity};
pub use discord::{DEFAULT_API_BASE, DiscordClient};

use crate::error::TransportError;

/// Deletes one message by id
///
/// Returns the raw HTTP status. Interpreting it is the caller's job; the only
/// error is failing to get a status at all (connect failure, timeout).
#[async_trait]
pub trait DeleteClient: Send + Sync {
    async fn delete_message(
        &self,
        credential: &Credential,
        conversation_id: &str,
        message_id: &str,
    ) -> Result<u16, TransportError>;
}
