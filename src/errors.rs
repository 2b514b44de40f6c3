//! Unified application error type.
//! Every module (db, crypto, core, sync, cli) returns AppError so that the
//! binary can report failures in a single place.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: i64 },

    // ---------------------------
    // Validation / referential guards
    // ---------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Cannot delete {entity} '{name}': {reason}")]
    DeleteBlocked {
        entity: &'static str,
        name: String,
        reason: String,
    },

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    // ---------------------------
    // Encryption
    // ---------------------------
    #[error("Wrong password or corrupted database file")]
    WrongPassword,

    #[error("Database is encrypted and no password is available")]
    Locked,

    #[error("Encryption error: {0}")]
    Crypto(String),

    #[error(
        "Database file is encrypted but encryption is marked disabled; \
         run `schooldesk crypt enable` with its password to recover"
    )]
    SentinelMissing,

    #[error("Too many failed unlock attempts ({0})")]
    UnlockFailed(u32),

    // ---------------------------
    // Archives / sync
    // ---------------------------
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("socket.io error: {0}")]
    SocketIo(#[from] rust_socketio::Error),

    #[error("Sync error: {0}")]
    Sync(String),

    #[error("Transport '{0}' is not available")]
    TransportUnavailable(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Export(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
