//! Upload filename normalization.
//!
//! # Invariants
//! - Sanitized names contain only `[A-Za-z0-9_.-]`.
//! - Sanitized names never start with `.` and never contain path separators.
//! - An empty result is an error, never an empty string.

use crate::error::ErrorClass;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use unicode_normalization::UnicodeNormalization;

static UNSAFE_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid filename regex"));

#[cfg_attr(not(windows), allow(dead_code))]
const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "AUX", "COM1", "COM2", "COM3", "COM4", "LPT1", "LPT2", "LPT3", "PRN", "NUL",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilenameError {
    /// Nothing usable was left after sanitizing.
    Empty,
}

impl FilenameError {
    pub fn class(&self) -> ErrorClass {
        ErrorClass::InvalidInput
    }
}

impl Display for FilenameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(
                f,
                "Invalid upload file name. Please rename the file and try again."
            ),
        }
    }
}

impl Error for FilenameError {}

/// Reduces `name` to a safe single path component.
///
/// Text is NFKD-folded to ASCII, separators become word breaks, words are
/// joined with `_`, anything outside `[A-Za-z0-9_.-]` is deleted, and
/// leading/trailing `.`/`_` are stripped.
///
/// # Errors
/// - `FilenameError::Empty` when nothing survives.
pub fn sanitize_filename(name: &str) -> Result<String, FilenameError> {
    let ascii = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if is_path_separator(c) { ' ' } else { c })
        .collect::<String>();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let replaced = UNSAFE_CHARS_RE.replace_all(&joined, "");
    let stripped = replaced.trim_matches(['.', '_']);

    if stripped.is_empty() {
        return Err(FilenameError::Empty);
    }

    #[cfg(windows)]
    {
        let stem = stripped.split('.').next().unwrap_or_default();
        if WINDOWS_DEVICE_NAMES.contains(&stem.to_ascii_uppercase().as_str()) {
            return Ok(format!("_{stripped}"));
        }
    }

    Ok(stripped.to_string())
}

fn is_path_separator(c: char) -> bool {
    c == '/' || (cfg!(windows) && c == '\\')
}
