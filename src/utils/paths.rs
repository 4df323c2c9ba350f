use std::borrow::Cow;
use std::env;
use std::fs::File;
use std::path::Path;

use crate::error::LoadError;

/// Maximum size for a single `channel.json` or `messages.json`: 256MB
pub const MAX_EXPORT_FILE_BYTES: u64 = 256 * 1024 * 1024;

/// Validates that an open file is within [`MAX_EXPORT_FILE_BYTES`]
///
/// Takes the open handle rather than a path so the size checked is the size
/// of the file actually read.
pub fn validate_file_size(file: &File, path: &Path) -> Result<(), LoadError> {
    let metadata =
        file.metadata().map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;

    let size = metadata.len();
    if size > MAX_EXPORT_FILE_BYTES {
        return Err(LoadError::TooLarge {
            path: path.to_path_buf(),
            size,
            max: MAX_EXPORT_FILE_BYTES,
        });
    }

    Ok(())
}

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use discord_purge::utils::format_path_with_tilde;
///
/// let path = PathBuf::from("/home/alice/Downloads/package/messages");
/// // Returns "~/Downloads/package/messages" if HOME=/home/alice
/// let formatted = format_path_with_tilde(&path);
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && !home.is_empty()
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
