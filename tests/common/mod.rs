//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Builder for Discord export directories (`messages/c<id>/...`)
pub struct ExportDirBuilder {
    temp_dir: TempDir,
}

impl ExportDirBuilder {
    /// Create a new builder with an empty `messages/` directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp_dir.path().join("messages")).expect("Failed to create messages dir");
        Self { temp_dir }
    }

    /// Path to the package root
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path to the `messages/` directory
    pub fn messages_dir(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("messages")
    }

    /// Add a channel directory
    pub fn with_channel(self, channel: ChannelBuilder) -> Self {
        channel.create_in(&self.messages_dir());
        self
    }

    /// Add a channel directory with raw file contents
    pub fn with_raw_channel(self, dir_name: &str, channel_json: &str, messages_json: &str) -> Self {
        let dir = self.messages_dir().join(dir_name);
        fs::create_dir_all(&dir).expect("Failed to create channel dir");
        fs::write(dir.join("channel.json"), channel_json).expect("Failed to write channel.json");
        fs::write(dir.join("messages.json"), messages_json).expect("Failed to write messages.json");
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for ExportDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one channel directory
pub struct ChannelBuilder {
    id: String,
    channel_type: String,
    recipients: Option<Vec<String>>,
    messages: Vec<MessageBuilder>,
}

impl ChannelBuilder {
    /// A DM with another user; `recipients` in export order
    pub fn dm(id: &str, recipients: [&str; 2]) -> Self {
        Self {
            id: id.to_string(),
            channel_type: "DM".to_string(),
            recipients: Some(recipients.iter().map(|r| r.to_string()).collect()),
            messages: Vec::new(),
        }
    }

    /// A server text channel
    pub fn guild(id: &str) -> Self {
        Self {
            id: id.to_string(),
            channel_type: "GUILD_TEXT".to_string(),
            recipients: None,
            messages: Vec::new(),
        }
    }

    /// A channel of any type name
    pub fn of_type(id: &str, channel_type: &str) -> Self {
        Self { id: id.to_string(), channel_type: channel_type.to_string(), recipients: None, messages: Vec::new() }
    }

    pub fn with_message(mut self, message: MessageBuilder) -> Self {
        self.messages.push(message);
        self
    }

    /// Add messages with generated ids and the given contents
    pub fn with_contents(mut self, contents: &[&str]) -> Self {
        let start = self.messages.len();
        for (i, text) in contents.iter().enumerate() {
            let id = format!("{}{:04}", self.id, start + i);
            self.messages.push(MessageBuilder::new(&id).contents(text));
        }
        self
    }

    fn channel_json(&self) -> String {
        let mut value = serde_json::json!({ "id": self.id, "type": self.channel_type });
        if let Some(recipients) = &self.recipients {
            value["recipients"] = serde_json::json!(recipients);
        }
        value.to_string()
    }

    fn messages_json(&self) -> String {
        let messages: Vec<serde_json::Value> = self.messages.iter().map(|m| m.to_json()).collect();
        serde_json::Value::Array(messages).to_string()
    }

    /// Create `c<id>/` in the given directory
    pub fn create_in(&self, dir: &Path) {
        let channel_dir = dir.join(format!("c{}", self.id));
        fs::create_dir_all(&channel_dir).expect("Failed to create channel dir");
        fs::write(channel_dir.join("channel.json"), self.channel_json())
            .expect("Failed to write channel.json");
        fs::write(channel_dir.join("messages.json"), self.messages_json())
            .expect("Failed to write messages.json");
    }
}

/// Builder for one entry of `messages.json`
pub struct MessageBuilder {
    id: String,
    timestamp: String,
    contents: String,
    attachments: String,
}

impl MessageBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            timestamp: "2021-07-09T14:03:27.000000+00:00".to_string(),
            contents: String::new(),
            attachments: String::new(),
        }
    }

    pub fn contents(mut self, contents: &str) -> Self {
        self.contents = contents.to_string();
        self
    }

    pub fn timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = timestamp.to_string();
        self
    }

    pub fn attachments(mut self, attachments: &str) -> Self {
        self.attachments = attachments.to_string();
        self
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "ID": self.id,
            "Timestamp": self.timestamp,
            "Contents": self.contents,
            "Attachments": self.attachments,
        })
    }
}
