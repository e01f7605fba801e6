//! SQLite storage bootstrap for the deposition tracking database.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Apply schema migrations in deterministic order.
//! - Guarantee the `entrylog` table exists before anything queries it.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Table creation tolerates concurrent first-run callers.

use crate::error::ErrorClass;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod entrylog;
pub mod migrations;
mod open;

pub use entrylog::{ensure_log_exists, update_entire_database};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// The named operation has no defined behavior yet.
    NotImplemented(&'static str),
}

impl DbError {
    /// Storage failures are fatal; unimplemented operations are server bugs.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Sqlite(_) | Self::UnsupportedSchemaVersion { .. } => ErrorClass::Fatal,
            Self::NotImplemented(_) => ErrorClass::Server,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::NotImplemented(operation) => write!(f, "{operation} is not implemented"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::NotImplemented(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
