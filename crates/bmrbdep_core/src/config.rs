//! Process configuration loaded once at startup.
//!
//! # Responsibility
//! - Parse the deployment `configuration.json` into an explicit struct.
//! - Derive install-relative locations (schema candidates, release marker).
//!
//! # Invariants
//! - `repo_path` is never empty.
//! - `root_dir` is the directory that held the configuration file.
//! - Configuration is passed by reference; core keeps no global copy.

use crate::error::ErrorClass;
use log::{error, info};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// File name of the deposition tracking database under `repo_path`.
pub const DATABASE_FILE_NAME: &str = "depositions.sqlite3";
/// File name of the release marker under `root_dir`.
pub const RELEASE_FILE_NAME: &str = "version.txt";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    EmptyRepoPath,
}

impl ConfigError {
    /// Configuration problems always stop startup.
    pub fn class(&self) -> ErrorClass {
        ErrorClass::Fatal
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read configuration `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid configuration `{}`: {source}", path.display())
            }
            Self::EmptyRepoPath => write!(f, "configuration key `repo_path` cannot be empty"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::EmptyRepoPath => None,
        }
    }
}

/// On-disk shape. Other components share the file, so unknown keys pass.
#[derive(Debug, Deserialize)]
struct RawConfig {
    repo_path: PathBuf,
    #[serde(default)]
    log_dir: Option<PathBuf>,
    #[serde(default)]
    log_level: Option<String>,
    #[serde(default)]
    schema_dirs: Option<Vec<PathBuf>>,
}

/// Explicit process configuration handed to every stateful component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory containing the configuration file; stands in for the install root.
    pub root_dir: PathBuf,
    /// Root under which the tracking database lives.
    pub repo_path: PathBuf,
    /// Absolute directory for rolling log files, when file logging is wanted.
    pub log_dir: Option<PathBuf>,
    /// Requested log level; falls back to the build-mode default.
    pub log_level: Option<String>,
    /// Ordered schema directory candidates overriding the defaults.
    pub schema_dirs: Option<Vec<PathBuf>>,
}

impl AppConfig {
    /// Builds a configuration without reading any file.
    pub fn new(root_dir: impl Into<PathBuf>, repo_path: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            repo_path: repo_path.into(),
            log_dir: None,
            log_level: None,
            schema_dirs: None,
        }
    }

    /// Loads and validates the JSON configuration at `path`.
    ///
    /// # Errors
    /// - `Io` when the file cannot be read.
    /// - `Parse` when it is not JSON or lacks `repo_path`.
    /// - `EmptyRepoPath` when `repo_path` is blank.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            error!(
                "event=config_load module=config status=error error_code=config_read_failed path={}",
                path.display()
            );
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let config = Self::from_json(&text, path)?;
        info!(
            "event=config_load module=config status=ok path={} repo_path={}",
            path.display(),
            config.repo_path.display()
        );
        Ok(config)
    }

    fn from_json(text: &str, path: &Path) -> ConfigResult<Self> {
        let raw: RawConfig = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if raw.repo_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyRepoPath);
        }

        let root_dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        Ok(Self {
            root_dir,
            repo_path: raw.repo_path,
            log_dir: raw.log_dir,
            log_level: raw.log_level,
            schema_dirs: raw.schema_dirs,
        })
    }

    /// Path of the deposition tracking database.
    pub fn database_path(&self) -> PathBuf {
        self.repo_path.join(DATABASE_FILE_NAME)
    }

    /// Path of the release marker file.
    pub fn release_path(&self) -> PathBuf {
        self.root_dir.join(RELEASE_FILE_NAME)
    }

    /// Schema directory candidates, primary first.
    pub fn schema_dir_candidates(&self) -> Vec<PathBuf> {
        if let Some(dirs) = &self.schema_dirs {
            return dirs.clone();
        }
        vec![
            self.root_dir.join("..").join("schema").join("schema_data"),
            self.root_dir.join("..").join("schema_data"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use crate::error::ErrorClass;
    use std::path::{Path, PathBuf};

    #[test]
    fn from_json_ignores_unknown_keys() {
        let config = AppConfig::from_json(
            r#"{"repo_path": "/srv/repo", "smtp": {"server": "localhost"}}"#,
            Path::new("/opt/bmrbdep/configuration.json"),
        )
        .unwrap();

        assert_eq!(config.repo_path, PathBuf::from("/srv/repo"));
        assert_eq!(config.root_dir, PathBuf::from("/opt/bmrbdep"));
        assert_eq!(
            config.database_path(),
            PathBuf::from("/srv/repo/depositions.sqlite3")
        );
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn from_json_requires_repo_path() {
        let err = AppConfig::from_json("{}", Path::new("configuration.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.class(), ErrorClass::Fatal);

        let err = AppConfig::from_json(r#"{"repo_path": ""}"#, Path::new("configuration.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyRepoPath));
    }

    #[test]
    fn bare_file_name_resolves_root_to_current_dir() {
        let config =
            AppConfig::from_json(r#"{"repo_path": "repo"}"#, Path::new("configuration.json"))
                .unwrap();
        assert_eq!(config.root_dir, PathBuf::from("."));
        assert_eq!(config.release_path(), PathBuf::from("./version.txt"));
    }

    #[test]
    fn default_schema_candidates_are_install_relative() {
        let config = AppConfig::new("/opt/bmrbdep/app", "/srv/repo");
        assert_eq!(
            config.schema_dir_candidates(),
            vec![
                PathBuf::from("/opt/bmrbdep/app/../schema/schema_data"),
                PathBuf::from("/opt/bmrbdep/app/../schema_data"),
            ]
        );
    }

    #[test]
    fn explicit_schema_dirs_override_defaults() {
        let config = AppConfig::from_json(
            r#"{"repo_path": "/srv/repo", "schema_dirs": ["/data/schemas"]}"#,
            Path::new("/etc/bmrbdep/configuration.json"),
        )
        .unwrap();
        assert_eq!(
            config.schema_dir_candidates(),
            vec![PathBuf::from("/data/schemas")]
        );
    }

    #[test]
    fn load_reads_file_next_to_install_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configuration.json");
        std::fs::write(
            &path,
            r#"{"repo_path": "/srv/repo", "log_dir": "/var/log/bmrbdep", "log_level": "warn"}"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.root_dir, dir.path());
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/bmrbdep")));
        assert_eq!(config.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
