//! Export reader: turns a Discord data package's `messages/` directory into a [`Backup`].
//!
//! Layout of the directory this reads:
//!
//! ```text
//! messages/
//!   c123456789/
//!     channel.json    {"id": ..., "type": "DM", "recipients": [...]}
//!     messages.json   [{"ID": ..., "Timestamp": ..., "Contents": ..., "Attachments": ...}]
//!   index.json
//! ```
//!
//! Pointing it at the package root also works; it descends into `messages/`.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::channel::ChannelRecord;
use crate::error::LoadError;
use crate::ledger::DeletionLedger;
use crate::models::{Backup, ConversationKind, DirectConversation, GroupConversation, Message};
use crate::utils::validate_file_size;

const CHANNEL_FILE: &str = "channel.json";
const MESSAGES_FILE: &str = "messages.json";
const MESSAGES_DIR: &str = "messages";

/// A channel directory after parsing
#[derive(Debug)]
enum ParsedChannel {
    Direct(DirectConversation),
    Group(GroupConversation),
    Skipped,
}

/// Load every conversation from an export directory
///
/// Messages already recorded in `ledger` are left out, so a reload after a
/// purge reflects what the remote service has deleted.
///
/// # Errors
///
/// - [`LoadError::NotFound`] if `export_dir` is not a directory
/// - [`LoadError::Parse`] if more than half of the channel directories are
///   malformed (individual bad channels are logged and skipped)
/// - [`LoadError::Io`] if the directory listing itself cannot be read
pub fn load_backup(export_dir: &Path, ledger: &DeletionLedger) -> Result<Backup, LoadError> {
    if !export_dir.is_dir() {
        return Err(LoadError::NotFound(export_dir.to_path_buf()));
    }

    let messages_dir = resolve_messages_dir(export_dir)?;
    let channel_dirs = discover_channel_dirs(&messages_dir)?;
    debug!(dir = %messages_dir.display(), channels = channel_dirs.len(), "discovered channel directories");

    // Collecting an indexed parallel iterator keeps directory order
    let parsed: Vec<Result<ParsedChannel, LoadError>> =
        channel_dirs.par_iter().map(|dir| parse_channel_dir(dir, ledger)).collect();

    let total = parsed.len();
    let mut failed = 0;
    let mut first_error = None;
    let mut seen_ids = HashSet::new();
    let mut backup = Backup::default();

    for (dir, result) in channel_dirs.iter().zip(parsed) {
        match result {
            Ok(ParsedChannel::Direct(conversation)) => {
                if seen_ids.insert(conversation.id.clone()) {
                    backup.direct.push(conversation);
                } else {
                    warn!(id = %conversation.id, dir = %dir.display(), "duplicate channel id, skipping");
                }
            }
            Ok(ParsedChannel::Group(conversation)) => {
                if seen_ids.insert(conversation.id.clone()) {
                    backup.groups.push(conversation);
                } else {
                    warn!(id = %conversation.id, dir = %dir.display(), "duplicate channel id, skipping");
                }
            }
            Ok(ParsedChannel::Skipped) => {}
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "failed to parse channel, skipping");
                failed += 1;
                first_error.get_or_insert(e);
            }
        }
    }

    if total > 0 && failed * 2 > total {
        let message = match first_error {
            Some(e) => format!("{} of {} channels failed to parse (first error: {})", failed, total, e),
            None => format!("{} of {} channels failed to parse", failed, total),
        };
        return Err(LoadError::Parse { path: messages_dir, message });
    }

    info!(
        direct = backup.direct.len(),
        groups = backup.groups.len(),
        messages = backup.message_count(),
        failed,
        "loaded backup"
    );

    Ok(backup)
}

/// Use `<dir>/messages` when given the package root
fn resolve_messages_dir(export_dir: &Path) -> Result<PathBuf, LoadError> {
    let nested = export_dir.join(MESSAGES_DIR);
    if nested.is_dir() && discover_channel_dirs(export_dir)?.is_empty() {
        return Ok(nested);
    }
    Ok(export_dir.to_path_buf())
}

/// Immediate subdirectories holding a `channel.json`, sorted by name
fn discover_channel_dirs(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut channel_dirs = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| LoadError::Io {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
            source: e.into(),
        })?;

        if entry.file_type().is_dir() && entry.path().join(CHANNEL_FILE).is_file() {
            channel_dirs.push(entry.into_path());
        }
    }

    Ok(channel_dirs)
}

fn parse_channel_dir(dir: &Path, ledger: &DeletionLedger) -> Result<ParsedChannel, LoadError> {
    let record: ChannelRecord = read_json(&dir.join(CHANNEL_FILE))?;

    let Some(kind) = record.channel_type.collection() else {
        debug!(id = %record.id, channel_type = %record.channel_type, "unsupported channel type");
        return Ok(ParsedChannel::Skipped);
    };

    let mut messages: Vec<Message> = read_json(&dir.join(MESSAGES_FILE))?;
    if let Some(deleted) = ledger.channel(&record.id) {
        messages.retain(|m| !deleted.contains(&m.id));
    }
    let messages: Vec<Arc<Message>> = messages.into_iter().map(Arc::new).collect();

    match kind {
        ConversationKind::Direct => match record.dm_counterpart() {
            Some((recipient_id, recipient_name)) => {
                Ok(ParsedChannel::Direct(DirectConversation {
                    id: record.id,
                    recipient_id,
                    recipient_name,
                    messages,
                }))
            }
            None => {
                debug!(id = %record.id, "DM without exactly two recipients");
                Ok(ParsedChannel::Skipped)
            }
        },
        ConversationKind::Group => {
            Ok(ParsedChannel::Group(GroupConversation { id: record.id, messages }))
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let file =
        File::open(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    validate_file_size(&file, path)?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| LoadError::Parse { path: path.to_path_buf(), message: e.to_string() })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write_channel(root: &Path, dir: &str, channel: &str, messages: &str) {
        let path = root.join(dir);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join(CHANNEL_FILE), channel).unwrap();
        fs::write(path.join(MESSAGES_FILE), messages).unwrap();
    }

    #[test]
    fn test_load_missing_directory() {
        let err = load_backup(Path::new("/definitely/not/here"), &DeletionLedger::new())
            .unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn test_load_sorts_channels_by_directory_name() {
        let dir = TempDir::new().unwrap();
        write_channel(dir.path(), "c2", r#"{"id": "2", "type": "GUILD_TEXT"}"#, "[]");
        write_channel(dir.path(), "c1", r#"{"id": "1", "type": "GUILD_TEXT"}"#, "[]");

        let backup = load_backup(dir.path(), &DeletionLedger::new()).unwrap();
        let ids: Vec<&str> = backup.groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_load_ignores_non_channel_entries() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.json"), "{}").unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        write_channel(dir.path(), "c1", r#"{"id": "1", "type": "GUILD_TEXT"}"#, "[]");

        let backup = load_backup(dir.path(), &DeletionLedger::new()).unwrap();
        assert_eq!(backup.groups.len(), 1);
    }

    #[test]
    fn test_load_from_package_root() {
        let dir = TempDir::new().unwrap();
        let messages = dir.path().join(MESSAGES_DIR);
        write_channel(&messages, "c1", r#"{"id": "1", "type": "GUILD_TEXT"}"#, "[]");

        let backup = load_backup(dir.path(), &DeletionLedger::new()).unwrap();
        assert_eq!(backup.groups.len(), 1);
    }

    #[test]
    fn test_load_duplicate_channel_id_keeps_first() {
        let dir = TempDir::new().unwrap();
        write_channel(
            dir.path(),
            "a",
            r#"{"id": "1", "type": "GUILD_TEXT"}"#,
            r#"[{"ID": "10", "Timestamp": 0, "Contents": "first"}]"#,
        );
        write_channel(dir.path(), "b", r#"{"id": "1", "type": "GUILD_TEXT"}"#, "[]");

        let backup = load_backup(dir.path(), &DeletionLedger::new()).unwrap();
        assert_eq!(backup.groups.len(), 1);
        assert_eq!(backup.groups[0].messages.len(), 1);
    }

    #[test]
    fn test_missing_messages_file_counts_as_failure() {
        let dir = TempDir::new().unwrap();
        let channel = dir.path().join("c1");
        fs::create_dir(&channel).unwrap();
        fs::write(channel.join(CHANNEL_FILE), r#"{"id": "1", "type": "GUILD_TEXT"}"#).unwrap();

        let err = load_backup(dir.path(), &DeletionLedger::new()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }
}
