//! Deposition log repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `entrylog` table for the deposition workflow.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `DepositionEntry::validate()` before SQL mutations.
//! - A duplicate restart token surfaces as `DuplicateRestartId`, never as a
//!   raw SQLite constraint error.

use crate::db::DbError;
use crate::error::ErrorClass;
use crate::model::entry::{DepositionEntry, EntryValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ENTRY_SELECT_SQL: &str = "SELECT
    bmrbig_id,
    restart_id,
    author_email,
    submission_date,
    release_date,
    contact_person1,
    title,
    bmrb_id,
    pdb_id,
    publication_doi
FROM entrylog";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Validation(EntryValidationError),
    Db(DbError),
    DuplicateRestartId(String),
    NotFound(String),
    InvalidData(String),
}

impl RepoError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_) | Self::DuplicateRestartId(_) | Self::NotFound(_) => {
                ErrorClass::InvalidInput
            }
            Self::Db(_) | Self::InvalidData(_) => ErrorClass::Server,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateRestartId(id) => write!(f, "restart_id already tracked: {id}"),
            Self::NotFound(id) => write!(f, "deposition not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::DuplicateRestartId(_) | Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<EntryValidationError> for RepoError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Pagination for listing entries, oldest first.
#[derive(Debug, Clone, Default)]
pub struct EntryListQuery {
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for deposition log rows.
pub trait DepositionLogRepository {
    fn create_entry(&self, entry: &DepositionEntry) -> RepoResult<i64>;
    fn update_entry(&self, entry: &DepositionEntry) -> RepoResult<()>;
    fn get_by_restart_id(&self, restart_id: &str) -> RepoResult<Option<DepositionEntry>>;
    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<DepositionEntry>>;
}

/// SQLite-backed deposition log repository.
pub struct SqliteDepositionLogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDepositionLogRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DepositionLogRepository for SqliteDepositionLogRepository<'_> {
    /// Inserts `entry` and returns the storage-assigned `bmrbig_id`.
    ///
    /// Any `bmrbig_id` already set on `entry` is ignored.
    fn create_entry(&self, entry: &DepositionEntry) -> RepoResult<i64> {
        entry.validate()?;

        self.conn
            .execute(
                "INSERT INTO entrylog (
                    restart_id,
                    author_email,
                    submission_date,
                    release_date,
                    contact_person1,
                    title,
                    bmrb_id,
                    pdb_id,
                    publication_doi
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
                params![
                    entry.restart_id.as_str(),
                    entry.author_email.as_deref(),
                    entry.submission_date.as_deref(),
                    entry.release_date.as_deref(),
                    entry.contact_person1.as_deref(),
                    entry.title.as_deref(),
                    entry.bmrb_id.as_deref(),
                    entry.pdb_id.as_deref(),
                    entry.publication_doi.as_deref(),
                ],
            )
            .map_err(|err| map_unique_violation(err, &entry.restart_id))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_entry(&self, entry: &DepositionEntry) -> RepoResult<()> {
        entry.validate()?;

        let changed = self.conn.execute(
            "UPDATE entrylog
             SET
                author_email = ?1,
                submission_date = ?2,
                release_date = ?3,
                contact_person1 = ?4,
                title = ?5,
                bmrb_id = ?6,
                pdb_id = ?7,
                publication_doi = ?8
             WHERE restart_id = ?9;",
            params![
                entry.author_email.as_deref(),
                entry.submission_date.as_deref(),
                entry.release_date.as_deref(),
                entry.contact_person1.as_deref(),
                entry.title.as_deref(),
                entry.bmrb_id.as_deref(),
                entry.pdb_id.as_deref(),
                entry.publication_doi.as_deref(),
                entry.restart_id.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(entry.restart_id.clone()));
        }

        Ok(())
    }

    fn get_by_restart_id(&self, restart_id: &str) -> RepoResult<Option<DepositionEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE restart_id = ?1;"))?;

        let mut rows = stmt.query([restart_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }

        Ok(None)
    }

    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<DepositionEntry>> {
        let mut sql = format!("{ENTRY_SELECT_SQL} ORDER BY bmrbig_id ASC");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }
}

fn map_unique_violation(err: rusqlite::Error, restart_id: &str) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        if failure.code == ErrorCode::ConstraintViolation {
            return RepoError::DuplicateRestartId(restart_id.to_string());
        }
    }
    err.into()
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<DepositionEntry> {
    let bmrbig_id: i64 = row.get("bmrbig_id")?;
    let restart_id = row
        .get::<_, Option<String>>("restart_id")?
        .ok_or_else(|| {
            RepoError::InvalidData(format!("missing restart_id for bmrbig_id {bmrbig_id}"))
        })?;

    Ok(DepositionEntry {
        bmrbig_id: Some(bmrbig_id),
        restart_id,
        author_email: row.get("author_email")?,
        submission_date: row.get("submission_date")?,
        release_date: row.get("release_date")?,
        contact_person1: row.get("contact_person1")?,
        title: row.get("title")?,
        bmrb_id: row.get("bmrb_id")?,
        pdb_id: row.get("pdb_id")?,
        publication_doi: row.get("publication_doi")?,
    })
}
