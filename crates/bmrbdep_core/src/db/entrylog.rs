//! Lazy initialization of the deposition log database.
//!
//! # Responsibility
//! - Ensure `<repo_path>/depositions.sqlite3` holds a queryable `entrylog`.
//!
//! # Invariants
//! - Safe to call on every startup and from racing processes.
//! - Storage errors propagate; nothing is swallowed or retried.

use super::{open_db, DbError, DbResult};
use crate::config::AppConfig;
use log::{error, info, warn};
use std::time::Instant;

/// Makes sure the deposition log table exists.
///
/// An existing database is left untouched apart from pending migrations.
///
/// # Errors
/// - Returns `DbError::Sqlite` when the file cannot be created or migrated.
/// - Returns `DbError::UnsupportedSchemaVersion` for databases written by a
///   newer build.
pub fn ensure_log_exists(config: &AppConfig) -> DbResult<()> {
    let started_at = Instant::now();
    let path = config.database_path();
    let existed = path.exists();

    match open_db(&path) {
        Ok(_conn) => {
            info!(
                "event=entrylog_init module=db status=ok existed={existed} path={} duration_ms={}",
                path.display(),
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=entrylog_init module=db status=error path={} duration_ms={} error={err}",
                path.display(),
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}

/// Bulk refresh of every deposition record.
///
/// There is no agreed behavior for this yet, so it reports itself as
/// unimplemented instead of pretending to succeed.
pub fn update_entire_database(config: &AppConfig) -> DbResult<()> {
    warn!(
        "event=entrylog_update_all module=db status=error error_code=not_implemented path={}",
        config.database_path().display()
    );
    Err(DbError::NotImplemented("update_entire_database"))
}
