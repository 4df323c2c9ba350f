use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tracing::debug;

use super::DeleteClient;
use super::credential::{Credential, Identity};
use crate::error::{CredentialError, TransportError};

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v9";
const AVATAR_CDN: &str = "https://cdn.discordapp.com/avatars";
const USER_AGENT: &str = concat!("discord-purge/", env!("CARGO_PKG_VERSION"));

// Characters to escape inside a single URL path segment
const SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\');

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
    username: String,
    #[serde(default)]
    avatar: Option<String>,
}

/// HTTP client for the two Discord endpoints this tool uses
#[derive(Debug, Clone)]
pub struct DiscordClient {
    http: Client,
    api_base: String,
}

impl DiscordClient {
    /// Build a client against `api_base` with a per-request timeout
    pub fn new(api_base: &str, request_timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder().timeout(request_timeout).user_agent(USER_AGENT).build()?;
        Ok(Self { http, api_base: api_base.trim_end_matches('/').to_string() })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn message_url(&self, conversation_id: &str, message_id: &str) -> String {
        format!(
            "{}/channels/{}/messages/{}",
            self.api_base,
            utf8_percent_encode(conversation_id, SEGMENT_ENCODE_SET),
            utf8_percent_encode(message_id, SEGMENT_ENCODE_SET)
        )
    }

    /// Look up the account behind `credential`
    ///
    /// Gates access to deletion; not called while a job runs.
    pub async fn resolve_identity(&self, credential: &Credential) -> Result<Identity, CredentialError> {
        let url = format!("{}/users/@me", self.api_base);
        let response =
            self.http.get(&url).header(AUTHORIZATION, credential.token()).send().await?;

        let status = response.status().as_u16();
        if status != 200 {
            debug!(status, "identity lookup rejected");
            return Err(CredentialError::Invalid(status));
        }

        let user: UserResponse =
            response.json().await.map_err(|e| CredentialError::Decode(e.to_string()))?;
        let avatar_url =
            user.avatar.as_ref().map(|hash| format!("{}/{}/{}.png", AVATAR_CDN, user.id, hash));

        Ok(Identity { id: user.id, username: user.username, avatar_url })
    }
}

#[async_trait]
impl DeleteClient for DiscordClient {
    async fn delete_message(
        &self,
        credential: &Credential,
        conversation_id: &str,
        message_id: &str,
    ) -> Result<u16, TransportError> {
        let url = self.message_url(conversation_id, message_id);
        let response = self.http.delete(&url).header(AUTHORIZATION, credential.token()).send().await?;
        let status = response.status().as_u16();
        debug!(conversation_id, message_id, status, "delete request finished");
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_url() {
        let client = DiscordClient::new("https://example.test/api/v9/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.api_base(), "https://example.test/api/v9");
        assert_eq!(
            client.message_url("123", "456"),
            "https://example.test/api/v9/channels/123/messages/456"
        );
    }

    #[test]
    fn test_message_url_escapes_segments() {
        let client = DiscordClient::new(DEFAULT_API_BASE, Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.message_url("1/../2", "a b?"),
            "https://discord.com/api/v9/channels/1%2F..%2F2/messages/a%20b%3F"
        );
    }
}
