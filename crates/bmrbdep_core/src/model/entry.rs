//! Deposition log entry model.
//!
//! # Responsibility
//! - Describe one tracked deposition and validate it before persistence.
//!
//! # Invariants
//! - `restart_id` is non-empty.
//! - Dates, when set, use `YYYY-MM-DD`.
//! - `bmrbig_id` is `None` until storage assigns one.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").expect("valid date regex")
});

/// One row of the `entrylog` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositionEntry {
    /// Auto-incremented primary key; `None` before insertion.
    pub bmrbig_id: Option<i64>,
    /// Token a submitter uses to resume the deposition.
    pub restart_id: String,
    pub author_email: Option<String>,
    /// `YYYY-MM-DD`.
    pub submission_date: Option<String>,
    /// `YYYY-MM-DD`.
    pub release_date: Option<String>,
    pub contact_person1: Option<String>,
    pub title: Option<String>,
    /// External accession assigned after release.
    pub bmrb_id: Option<String>,
    /// Linked structure-database identifier.
    pub pdb_id: Option<String>,
    pub publication_doi: Option<String>,
}

impl DepositionEntry {
    /// Creates an entry with a freshly generated restart token.
    pub fn new() -> Self {
        Self::with_restart_id(Uuid::new_v4().to_string())
    }

    /// Creates an entry for an existing restart token.
    pub fn with_restart_id(restart_id: impl Into<String>) -> Self {
        Self {
            restart_id: restart_id.into(),
            ..Self::default()
        }
    }

    /// Checks field-level invariants.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.restart_id.trim().is_empty() {
            return Err(EntryValidationError::EmptyRestartId);
        }
        check_date("submission_date", self.submission_date.as_deref())?;
        check_date("release_date", self.release_date.as_deref())?;
        if let Some(email) = self.author_email.as_deref() {
            if !email.contains('@') {
                return Err(EntryValidationError::InvalidEmail(email.to_string()));
            }
        }
        Ok(())
    }
}

fn check_date(field: &'static str, value: Option<&str>) -> Result<(), EntryValidationError> {
    match value {
        Some(date) if !DATE_RE.is_match(date) => Err(EntryValidationError::InvalidDate {
            field,
            value: date.to_string(),
        }),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    EmptyRestartId,
    InvalidDate { field: &'static str, value: String },
    InvalidEmail(String),
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRestartId => write!(f, "restart_id cannot be empty"),
            Self::InvalidDate { field, value } => {
                write!(f, "{field} must be YYYY-MM-DD, got `{value}`")
            }
            Self::InvalidEmail(value) => write!(f, "invalid author email `{value}`"),
        }
    }
}

impl Error for EntryValidationError {}

#[cfg(test)]
mod tests {
    use super::{DepositionEntry, EntryValidationError};

    #[test]
    fn new_entries_get_distinct_tokens() {
        let first = DepositionEntry::new();
        let second = DepositionEntry::new();
        assert_ne!(first.restart_id, second.restart_id);
        assert!(first.bmrbig_id.is_none());
        first.validate().unwrap();
    }

    #[test]
    fn validate_rejects_blank_token() {
        let entry = DepositionEntry::with_restart_id("  ");
        assert_eq!(entry.validate(), Err(EntryValidationError::EmptyRestartId));
    }

    #[test]
    fn validate_checks_date_shape() {
        let mut entry = DepositionEntry::with_restart_id("token");
        entry.submission_date = Some("2024-02-30".to_string());
        entry.validate().unwrap();

        entry.release_date = Some("02/03/2024".to_string());
        let err = entry.validate().unwrap_err();
        assert!(matches!(
            err,
            EntryValidationError::InvalidDate { field: "release_date", .. }
        ));
    }

    #[test]
    fn validate_checks_email() {
        let mut entry = DepositionEntry::with_restart_id("token");
        entry.author_email = Some("nobody".to_string());
        assert!(matches!(
            entry.validate(),
            Err(EntryValidationError::InvalidEmail(_))
        ));
    }
}
