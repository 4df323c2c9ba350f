//! Local record of deleted messages
//!
//! A Discord export is a static snapshot, so reloading it after a purge would
//! show the deleted messages again. Every message the remote service reports
//! as gone is written to `deleted_messages.json` and hidden on the next load.
//!
//! Ledger location: platform-specific data directories
//! - macOS: `~/Library/Application Support/discord-purge/`
//! - Linux: `~/.local/share/discord-purge/`
//! - Windows: `%APPDATA%\discord-purge\`

pub mod persistence;
pub mod record;

pub use persistence::{LEDGER_FILENAME, default_data_dir, ledger_path};
pub use record::{DeletedMessage, DeletionLedger, LedgerFile};
