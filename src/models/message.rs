use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single message as it appears in the export's `messages.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "ID", deserialize_with = "crate::parsers::deserializers::deserialize_id")]
    pub id: String,
    #[serde(
        rename = "Timestamp",
        deserialize_with = "crate::parsers::deserializers::deserialize_timestamp"
    )]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "Contents", default)]
    pub contents: String,
    #[serde(
        rename = "Attachments",
        default,
        deserialize_with = "crate::parsers::deserializers::deserialize_attachments"
    )]
    pub attachments: Option<String>,
}

impl Message {
    pub fn has_attachments(&self) -> bool {
        self.attachments.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_export_json() {
        let json = r#"{
            "ID": 1093847561234567890,
            "Timestamp": "2023-04-01 18:22:05",
            "Contents": "see you tomorrow",
            "Attachments": ""
        }"#;

        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.id, "1093847561234567890");
        assert_eq!(message.contents, "see you tomorrow");
        assert!(!message.has_attachments());
        assert_eq!(message.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(), "2023-04-01 18:22:05");
    }

    #[test]
    fn test_message_with_attachment() {
        let json = r#"{
            "ID": "42",
            "Timestamp": "2023-04-01T18:22:05+00:00",
            "Contents": "",
            "Attachments": "https://cdn.discordapp.com/attachments/1/2/cat.png"
        }"#;

        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.id, "42");
        assert!(message.has_attachments());
        assert_eq!(
            message.attachments.as_deref(),
            Some("https://cdn.discordapp.com/attachments/1/2/cat.png")
        );
    }

    #[test]
    fn test_message_missing_optional_fields() {
        let json = r#"{"ID": "7", "Timestamp": 1680373325000}"#;

        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.contents, "");
        assert!(message.attachments.is_none());
    }
}
