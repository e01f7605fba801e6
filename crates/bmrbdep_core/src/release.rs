//! Release marker accessor.

use crate::config::AppConfig;
use crate::error::ErrorClass;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

#[derive(Debug)]
pub enum ReleaseError {
    Io { path: PathBuf, source: std::io::Error },
}

impl ReleaseError {
    pub fn class(&self) -> ErrorClass {
        ErrorClass::Server
    }
}

impl Display for ReleaseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read release marker `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ReleaseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Returns the trimmed contents of `version.txt` next to the configuration.
pub fn read_release(config: &AppConfig) -> Result<String, ReleaseError> {
    let path = config.release_path();
    let text = std::fs::read_to_string(&path).map_err(|source| ReleaseError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(text.trim().to_string())
}
