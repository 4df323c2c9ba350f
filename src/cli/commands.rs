use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use tokio::runtime::Runtime;
use tracing::warn;

use super::progress::PurgeProgress;
use crate::client::{Credential, DiscordClient, Identity};
use crate::config::PurgeConfig;
use crate::deletion::{DeletionOrchestrator, JobResult};
use crate::filters::{DISPLAY_LIMIT, FilterCriteria, exceeds_display_limit, filter_backup};
use crate::ledger::DeletionLedger;
use crate::models::{Backup, FilteredMessage};
use crate::parsers::load_backup;
use crate::utils::{format_path_with_tilde, one_line_preview, sanitize};

const LIST_PREVIEW_CHARS: usize = 100;

#[derive(Parser)]
#[command(name = "discord-purge")]
#[command(version)]
#[command(about = "Find and delete your own messages using a Discord data export", long_about = None)]
pub struct Cli {
    /// Show debug logs on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Export location and message filter shared by `list` and `purge`
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Export directory (the package root or its `messages/` folder)
    pub export_dir: PathBuf,

    /// Only messages containing this text, ignoring case
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Leave direct messages out
    #[arg(long)]
    pub no_dms: bool,

    /// Leave server and group messages out
    #[arg(long)]
    pub no_guilds: bool,
}

impl FilterArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(self.query.clone(), !self.no_dms, !self.no_guilds)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show statistics about an export
    Stats {
        /// Export directory (the package root or its `messages/` folder)
        export_dir: PathBuf,
    },
    /// List messages matching a filter
    List(FilterArgs),
    /// Show the account a token belongs to
    Whoami {
        /// Discord user token
        #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Delete messages matching a filter from Discord
    Purge {
        #[command(flatten)]
        filter: FilterArgs,

        /// Discord user token
        #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Show what would be deleted without contacting Discord
        #[arg(long)]
        dry_run: bool,
    },
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    crate::logging::init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Stats { export_dir }) => show_stats(&export_dir)?,
        Some(Commands::List(filter)) => list_messages(&filter)?,
        Some(Commands::Whoami { token }) => whoami(token)?,
        Some(Commands::Purge { filter, token, yes, dry_run }) => {
            return purge(&filter, token, yes, dry_run);
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load(config: &PurgeConfig, export_dir: &Path) -> Result<(DeletionLedger, Backup)> {
    let ledger_path = config.ledger_path();
    let ledger = DeletionLedger::load(&ledger_path)
        .with_context(|| format!("Failed to read ledger {}", ledger_path.display()))?;
    let backup = load_backup(export_dir, &ledger)
        .with_context(|| format!("Failed to load export from {}", export_dir.display()))?;
    Ok((ledger, backup))
}

fn show_stats(export_dir: &Path) -> Result<()> {
    let config = PurgeConfig::from_env()?;
    let (ledger, backup) = load(&config, export_dir)?;

    println!("Discord Export Statistics");
    println!("=========================");
    println!("Total messages: {}", backup.message_count());
    println!(
        "  Direct messages: {} in {} conversations",
        backup.direct_message_count(),
        backup.direct.len()
    );
    println!(
        "  Server messages: {} in {} channels",
        backup.group_message_count(),
        backup.groups.len()
    );
    println!("Already deleted: {}", ledger.len());
    println!();
    println!("Export directory: {}", format_path_with_tilde(export_dir));
    println!("Ledger: {}", format_path_with_tilde(&config.ledger_path()));

    if let Some((oldest, newest)) = backup.time_span() {
        println!("Oldest message: {}", format_timestamp(&oldest));
        println!("Newest message: {}", format_timestamp(&newest));
    }

    Ok(())
}

fn list_messages(filter: &FilterArgs) -> Result<()> {
    let config = PurgeConfig::from_env()?;
    let (_, backup) = load(&config, &filter.export_dir)?;
    let filtered = filter_backup(&backup, &filter.criteria());

    if !filter.no_dms {
        print_collection("Direct messages", &filtered.direct);
    }
    if !filter.no_guilds {
        print_collection("Server messages", &filtered.groups);
    }
    println!("Total matching: {}", filtered.len());

    Ok(())
}

fn print_collection(title: &str, messages: &[FilteredMessage]) {
    let heading = format!("{} ({})", title, messages.len());
    println!("{}", heading);
    println!("{}", "-".repeat(heading.chars().count()));

    if exceeds_display_limit(messages.len()) {
        println!("More than {} messages match; narrow the query to list them.", DISPLAY_LIMIT);
    } else {
        for item in messages {
            let message = &item.message;
            let attachment = if message.has_attachments() { " [attachment]" } else { "" };
            println!(
                "[{}] {}/{}: {}{}",
                format_timestamp(&message.timestamp),
                sanitize(&item.conversation_id),
                sanitize(&message.id),
                one_line_preview(&message.contents, LIST_PREVIEW_CHARS),
                attachment
            );
        }
    }
    println!();
}

fn whoami(token: String) -> Result<()> {
    let config = PurgeConfig::from_env()?;
    let runtime = Runtime::new().context("Failed to start async runtime")?;
    let identity = runtime.block_on(authenticate(&config, &Credential::new(token)))?.1;

    println!("Logged in as {}", identity.username);
    println!("User id: {}", identity.id);
    if let Some(avatar) = &identity.avatar_url {
        println!("Avatar: {}", avatar);
    }

    Ok(())
}

async fn authenticate(
    config: &PurgeConfig,
    credential: &Credential,
) -> Result<(DiscordClient, Identity)> {
    if credential.is_empty() {
        bail!("No token given; pass --token or set DISCORD_TOKEN");
    }
    let client = DiscordClient::new(&config.api_base, config.request_timeout)
        .context("Failed to build HTTP client")?;
    let identity = client.resolve_identity(credential).await.context("Token check failed")?;
    Ok((client, identity))
}

fn purge(filter: &FilterArgs, token: Option<String>, yes: bool, dry_run: bool) -> Result<ExitCode> {
    let config = PurgeConfig::from_env()?;
    let ledger_path = config.ledger_path();

    if dry_run {
        let (_, backup) = load(&config, &filter.export_dir)?;
        let filtered = filter_backup(&backup, &filter.criteria());
        println!(
            "Dry run: {} messages would be deleted ({} direct, {} server)",
            filtered.len(),
            filtered.direct.len(),
            filtered.groups.len()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let credential = Credential::new(token.unwrap_or_default());
    let runtime = Runtime::new().context("Failed to start async runtime")?;
    let (client, identity) = runtime.block_on(authenticate(&config, &credential))?;
    println!("Logged in as {}", identity.username);

    let (mut ledger, backup) = load(&config, &filter.export_dir)?;
    let criteria = filter.criteria();
    let filtered = filter_backup(&backup, &criteria);
    if filtered.is_empty() {
        println!("No messages match.");
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} messages match ({} direct, {} server)",
        filtered.len(),
        filtered.direct.len(),
        filtered.groups.len()
    );
    if !yes && !confirm(&format!("Delete {} messages from Discord?", filtered.len()))? {
        println!("Aborted.");
        return Ok(ExitCode::SUCCESS);
    }

    let orchestrator = DeletionOrchestrator::new(Arc::new(client)).with_config(config.job);
    let items = filtered.into_deletion_order();
    let result =
        runtime.block_on(drive_job(&orchestrator, items, credential, &mut ledger, &ledger_path))?;

    ledger
        .save(&ledger_path)
        .with_context(|| format!("Failed to save ledger {}", ledger_path.display()))?;

    let refreshed = load_backup(&filter.export_dir, &ledger)
        .with_context(|| format!("Failed to reload export from {}", filter.export_dir.display()))?;
    let remaining = filter_backup(&refreshed, &criteria).len();

    print_summary(&result, remaining);

    if result.is_complete() && result.failed == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Run the job to completion, mirroring deleted items into `ledger`
///
/// The ledger is saved after every batch so an interrupted run still hides
/// what was deleted. Ctrl-C cancels at the next batch boundary.
async fn drive_job(
    orchestrator: &DeletionOrchestrator,
    items: Vec<FilteredMessage>,
    credential: Credential,
    ledger: &mut DeletionLedger,
    ledger_path: &Path,
) -> Result<JobResult> {
    let display = PurgeProgress::new(items.len());
    let mut job = orchestrator.start(items, credential);
    let mut progress = job.watch_progress();
    let mut outcomes = job.outcomes().context("Outcome stream already taken")?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut cancel_requested = false;
    let mut progress_open = true;
    let mut dirty = false;

    loop {
        tokio::select! {
            outcome = outcomes.next() => {
                let Some(outcome) = outcome else { break };
                if outcome.outcome.is_deleted() {
                    dirty |= ledger.record(&outcome.item.conversation_id, outcome.item.message_id());
                }
                display.on_outcome(&outcome);
            }
            changed = progress.changed(), if progress_open => {
                if changed.is_err() {
                    progress_open = false;
                    continue;
                }
                let completed = progress.borrow_and_update().completed;
                display.set_completed(completed);
                if dirty {
                    match ledger.save(ledger_path) {
                        Ok(()) => dirty = false,
                        Err(e) => warn!(error = %e, "failed to save ledger, will retry"),
                    }
                }
            }
            _ = &mut ctrl_c, if !cancel_requested => {
                cancel_requested = true;
                job.cancel();
                display.note("Cancelling after the current batch...");
            }
        }
    }

    let result = job.result().await?;
    display.set_completed(result.processed);
    display.finish();
    Ok(result)
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn print_summary(result: &JobResult, remaining: usize) {
    println!();
    println!("Deletion Summary");
    println!("================");
    println!("Deleted: {} of {}", result.deleted, result.total);
    if result.failed > 0 {
        println!(
            "Failed: {} ({} without a response)",
            result.failed, result.transport_failures
        );
    }
    if result.cancelled {
        println!("Cancelled with {} messages not attempted", result.remaining());
    }
    if let Some(reason) = &result.aborted {
        println!("Stopped early: {}", reason);
    }
    println!("Still matching the filter: {}", remaining);
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_filter_args_to_criteria() {
        let cli = Cli::try_parse_from(["discord-purge", "list", "/tmp/export", "-q", "Lol", "--no-dms"])
            .unwrap();
        let Some(Commands::List(filter)) = cli.command else { panic!("expected list") };
        let criteria = filter.criteria();
        assert_eq!(criteria.query, "Lol");
        assert!(!criteria.include_direct);
        assert!(criteria.include_groups);
    }

    #[test]
    fn test_purge_flags() {
        let cli = Cli::try_parse_from([
            "discord-purge",
            "purge",
            "/tmp/export",
            "--token",
            "abc",
            "--yes",
            "--dry-run",
        ])
        .unwrap();
        let Some(Commands::Purge { filter, token, yes, dry_run }) = cli.command else {
            panic!("expected purge")
        };
        assert_eq!(filter.export_dir, PathBuf::from("/tmp/export"));
        assert_eq!(token.as_deref(), Some("abc"));
        assert!(yes && dry_run);
    }
}
