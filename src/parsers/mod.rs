//! Readers for the Discord data package
//!
//! # Error Handling Strategy
//!
//! Loading follows a **graceful degradation** approach:
//!
//! - **Individual channel failures**: A channel directory with a malformed or missing
//!   `channel.json`/`messages.json` is logged and skipped, so one bad channel does not
//!   hide the rest of the export.
//!
//! - **Catastrophic failure detection**: If more than half of the channel directories
//!   fail, the load returns [`LoadError::Parse`](crate::error::LoadError::Parse).
//!
//! - **Unsupported channels**: Channel types with no deletable messages (forums,
//!   categories) and DMs without exactly two recipients are skipped silently.
//!
//! Errors are typed ([`LoadError`](crate::error::LoadError)) so callers can tell a
//! wrong path from a malformed export.

pub mod channel;
pub mod deserializers;
pub mod export;

pub use channel::{ChannelRecord, ChannelType};
pub use export::load_backup;
