use std::path::PathBuf;

use thiserror::Error;

/// Failures loading a Discord export into a [`Backup`](crate::models::Backup)
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Export directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Malformed export at {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("File too large: {} ({size} bytes, max {max} bytes)", .path.display())]
    TooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures validating a token against the remote service
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid token (status {0})")]
    Invalid(u16),

    #[error("Could not reach Discord: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected identity response: {0}")]
    Decode(String),
}

/// A delete call that never produced a status code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("IO error on ledger {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt ledger {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue { name: &'static str, value: String, reason: String },

    #[error("No platform data directory available; set DISCORD_PURGE_DATA_DIR")]
    NoDataDir,
}

/// Failures observing a job through its [`JobHandle`](crate::deletion::JobHandle)
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Deletion job panicked: {0}")]
    Panicked(String),

    #[error("Deletion job result was already taken")]
    ResultTaken,
}
