//! Ledger persistence: load/save with atomic writes

use std::fs;
use std::path::{Path, PathBuf};

use super::record::{DeletionLedger, LedgerFile};
use crate::error::LedgerError;

pub const LEDGER_FILENAME: &str = "deleted_messages.json";

/// Application directory name under the platform data directory
const APP_DIR_NAME: &str = "discord-purge";

/// Get the platform-specific data directory for the ledger
///
/// - Linux: `~/.local/share/discord-purge/`
/// - macOS: `~/Library/Application Support/discord-purge/`
/// - Windows: `%APPDATA%\discord-purge\`
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|base| base.join(APP_DIR_NAME))
}

/// Path to the ledger file inside `data_dir`
pub fn ledger_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LEDGER_FILENAME)
}

impl DeletionLedger {
    /// Load the ledger stored at `path`
    ///
    /// A missing file is an empty ledger, not an error.
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let data = fs::read_to_string(path)
            .map_err(|source| LedgerError::Io { path: path.to_path_buf(), source })?;
        if data.trim().is_empty() {
            return Ok(Self::new());
        }

        let file: LedgerFile = serde_json::from_str(&data)
            .map_err(|source| LedgerError::Corrupt { path: path.to_path_buf(), source })?;
        Ok(Self::from_file(file))
    }

    /// Save the ledger to `path` atomically (temp file + rename)
    pub fn save(&self, path: &Path) -> Result<(), LedgerError> {
        let io_err = |source: std::io::Error| LedgerError::Io { path: path.to_path_buf(), source };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(&self.to_file())
            .map_err(|source| LedgerError::Corrupt { path: path.to_path_buf(), source })?;

        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        fs::write(&temp_path, json).map_err(io_err)?;
        fs::rename(&temp_path, path).map_err(io_err)?;

        Ok(())
    }
}
