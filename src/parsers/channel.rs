use std::fmt;

use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::ConversationKind;

/// Placeholder Discord writes in place of a deleted account's name
pub const DELETED_USER: &str = "Deleted User";

/// Discord channel type as written in `channel.json`
///
/// Older packages use names (`"DM"`, `"GUILD_TEXT"`), newer ones the numeric
/// API values. Both map onto the same variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelType {
    Dm,
    GroupDm,
    GuildText,
    GuildVoice,
    GuildAnnouncement,
    Thread,
    Other(String),
}

impl ChannelType {
    fn from_name(name: &str) -> Self {
        match name {
            "DM" => ChannelType::Dm,
            "GROUP_DM" => ChannelType::GroupDm,
            "GUILD_TEXT" => ChannelType::GuildText,
            "GUILD_VOICE" | "GUILD_STAGE_VOICE" => ChannelType::GuildVoice,
            "GUILD_ANNOUNCEMENT" | "GUILD_NEWS" => ChannelType::GuildAnnouncement,
            "PUBLIC_THREAD" | "PRIVATE_THREAD" | "ANNOUNCEMENT_THREAD" | "GUILD_NEWS_THREAD"
            | "GUILD_PUBLIC_THREAD" | "GUILD_PRIVATE_THREAD" => ChannelType::Thread,
            other => ChannelType::Other(other.to_string()),
        }
    }

    fn from_code(code: u64) -> Self {
        match code {
            0 => ChannelType::GuildText,
            1 => ChannelType::Dm,
            2 | 13 => ChannelType::GuildVoice,
            3 => ChannelType::GroupDm,
            5 => ChannelType::GuildAnnouncement,
            10..=12 => ChannelType::Thread,
            other => ChannelType::Other(other.to_string()),
        }
    }

    /// Which backup collection this channel's messages belong to, if any
    pub fn collection(&self) -> Option<ConversationKind> {
        match self {
            ChannelType::Dm => Some(ConversationKind::Direct),
            ChannelType::GroupDm
            | ChannelType::GuildText
            | ChannelType::GuildVoice
            | ChannelType::GuildAnnouncement
            | ChannelType::Thread => Some(ConversationKind::Group),
            ChannelType::Other(_) => None,
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelType::Dm => f.write_str("DM"),
            ChannelType::GroupDm => f.write_str("GROUP_DM"),
            ChannelType::GuildText => f.write_str("GUILD_TEXT"),
            ChannelType::GuildVoice => f.write_str("GUILD_VOICE"),
            ChannelType::GuildAnnouncement => f.write_str("GUILD_ANNOUNCEMENT"),
            ChannelType::Thread => f.write_str("THREAD"),
            ChannelType::Other(name) => f.write_str(name),
        }
    }
}

impl<'de> Deserialize<'de> for ChannelType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(ChannelType::from_name(&s)),
            Value::Number(n) => n
                .as_u64()
                .map(ChannelType::from_code)
                .ok_or_else(|| Error::custom("channel type must be a non-negative integer")),
            _ => Err(Error::custom("channel type must be a string or number")),
        }
    }
}

/// Contents of a channel's `channel.json`
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelRecord {
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    #[serde(default)]
    pub recipients: Option<Vec<String>>,
}

impl ChannelRecord {
    /// Counterpart `(id, display name)` of a DM with exactly two recipients
    ///
    /// The display name skips the deleted-account placeholder when it is listed first.
    pub fn dm_counterpart(&self) -> Option<(String, String)> {
        match self.recipients.as_deref() {
            Some([first, second]) => {
                let name = if first == DELETED_USER { second } else { first };
                Some((second.clone(), name.clone()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_type_names() {
        let record: ChannelRecord =
            serde_json::from_str(r#"{"id": "1", "type": "GUILD_TEXT"}"#).unwrap();
        assert_eq!(record.channel_type, ChannelType::GuildText);
        assert_eq!(record.channel_type.collection(), Some(ConversationKind::Group));
        assert!(record.recipients.is_none());
    }

    #[test]
    fn test_channel_type_codes() {
        let record: ChannelRecord = serde_json::from_str(r#"{"id": 9, "type": 1}"#).unwrap();
        assert_eq!(record.id, "9");
        assert_eq!(record.channel_type, ChannelType::Dm);
        assert_eq!(ChannelType::from_code(11), ChannelType::Thread);
        assert_eq!(ChannelType::from_code(15), ChannelType::Other("15".to_string()));
    }

    #[test]
    fn test_unknown_channel_type_has_no_collection() {
        let record: ChannelRecord =
            serde_json::from_str(r#"{"id": "1", "type": "GUILD_FORUM"}"#).unwrap();
        assert_eq!(record.channel_type.collection(), None);
        assert_eq!(record.channel_type.to_string(), "GUILD_FORUM");
    }

    #[test]
    fn test_dm_counterpart() {
        let record: ChannelRecord = serde_json::from_str(
            r#"{"id": "1", "type": "DM", "recipients": ["alice", "bob"]}"#,
        )
        .unwrap();
        assert_eq!(record.dm_counterpart(), Some(("bob".to_string(), "alice".to_string())));
    }

    #[test]
    fn test_dm_counterpart_deleted_user() {
        let record: ChannelRecord = serde_json::from_str(
            r#"{"id": "1", "type": "DM", "recipients": ["Deleted User", "bob"]}"#,
        )
        .unwrap();
        assert_eq!(record.dm_counterpart(), Some(("bob".to_string(), "bob".to_string())));
    }

    #[test]
    fn test_dm_counterpart_requires_two_recipients() {
        let record: ChannelRecord =
            serde_json::from_str(r#"{"id": "1", "type": "DM", "recipients": ["solo"]}"#).unwrap();
        assert!(record.dm_counterpart().is_none());
    }
}
