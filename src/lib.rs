//! Discord Purge - Find your messages in a Discord data export and delete them
//!
//! This library provides the pieces behind the `discord-purge` CLI:
//!
//! - Loading a Discord data package's `messages/` directory into a [`Backup`]
//! - Filtering messages by text and by origin (DMs vs servers)
//! - Deleting the filtered set through Discord's API in rate-limited batches,
//!   with live progress, per-item outcomes and cooperative cancellation
//! - Remembering deleted messages so reloading the static export reflects them
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use discord_purge::client::{Credential, DiscordClient, DEFAULT_API_BASE};
//! use discord_purge::deletion::DeletionOrchestrator;
//! use discord_purge::filters::{filter_backup, FilterCriteria};
//! use discord_purge::ledger::DeletionLedger;
//! use discord_purge::load_backup;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let backup = load_backup(Path::new("package/messages"), &DeletionLedger::new())?;
//! let matches = filter_backup(&backup, &FilterCriteria::all().with_query("typo"));
//!
//! let client = DiscordClient::new(DEFAULT_API_BASE, Duration::from_secs(30))?;
//! let orchestrator = DeletionOrchestrator::new(Arc::new(client));
//! let mut job = orchestrator.start(matches.into_deletion_order(), Credential::new("token"));
//! let result = job.result().await?;
//! println!("Deleted {} of {}", result.deleted, result.total);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod deletion;
pub mod error;
pub mod filters;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use deletion::{DeletionOrchestrator, JobHandle, JobResult};
pub use filters::{FilterCriteria, filter_backup};
pub use models::{Backup, FilteredMessage, Message};
pub use parsers::export::load_backup;
