//! Disk-backed schema store.
//!
//! # Responsibility
//! - Locate the schema directory from ordered candidates.
//! - Load `<version>.json.zlib` as a JSON tree or open `<version>.xml`.
//!
//! # Invariants
//! - Directory resolution happens per call; nothing is memoized.
//! - Versions never escape the schema directory.

use crate::config::AppConfig;
use crate::error::ErrorClass;
use flate2::read::ZlibDecoder;
use log::{debug, error, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

const JSON_SUFFIX: &str = ".json.zlib";
const XML_SUFFIX: &str = ".xml";

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while resolving or loading a schema.
#[derive(Debug)]
pub enum SchemaError {
    /// The requested version has no readable artifact.
    InvalidVersion { version: String },
    /// A format other than `json`/`xml` reached the store.
    UnsupportedFormat(String),
    /// None of the candidate schema directories exist.
    MissingSchemaDirectory { candidates: Vec<PathBuf> },
    /// The compressed artifact exists but does not inflate to UTF-8 text.
    Inflate { path: PathBuf, source: std::io::Error },
    /// The inflated artifact is not a JSON document.
    Parse { path: PathBuf, source: serde_json::Error },
    /// The schema directory could not be listed.
    Io { path: PathBuf, source: std::io::Error },
}

impl SchemaError {
    /// Returns how callers should surface this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidVersion { .. } => ErrorClass::InvalidInput,
            Self::UnsupportedFormat(_)
            | Self::MissingSchemaDirectory { .. }
            | Self::Inflate { .. }
            | Self::Parse { .. }
            | Self::Io { .. } => ErrorClass::Server,
        }
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidVersion { .. } => write!(f, "Invalid schema version."),
            Self::UnsupportedFormat(format) => {
                write!(f, "Attempted to load invalid schema type `{format}`.")
            }
            Self::MissingSchemaDirectory { candidates } => {
                let joined = candidates
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "no schema directory found; tried: {joined}")
            }
            Self::Inflate { path, source } => {
                write!(f, "cannot inflate schema `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "schema `{}` is not valid JSON: {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "cannot read schema directory `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for SchemaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Inflate { source, .. } | Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::InvalidVersion { .. }
            | Self::UnsupportedFormat(_)
            | Self::MissingSchemaDirectory { .. } => None,
        }
    }
}

/// On-disk encoding of a schema release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SchemaFormat {
    /// zlib-compressed JSON, parsed into a document.
    #[default]
    Json,
    /// Raw XML, returned unparsed.
    Xml,
}

impl SchemaFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    fn file_suffix(self) -> &'static str {
        match self {
            Self::Json => JSON_SUFFIX,
            Self::Xml => XML_SUFFIX,
        }
    }
}

impl FromStr for SchemaFormat {
    type Err = SchemaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            other => Err(SchemaError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl Display for SchemaFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loaded schema. Callers must branch on the shape they asked for.
#[derive(Debug)]
pub enum SchemaArtifact {
    /// Parsed JSON schema tree.
    Document(Value),
    /// Open XML stream; the caller owns and closes it.
    Stream(BufReader<File>),
}

impl SchemaArtifact {
    pub fn into_document(self) -> Option<Value> {
        match self {
            Self::Document(value) => Some(value),
            Self::Stream(_) => None,
        }
    }

    pub fn into_stream(self) -> Option<BufReader<File>> {
        match self {
            Self::Document(_) => None,
            Self::Stream(reader) => Some(reader),
        }
    }
}

/// Read-only access to versioned schema artifacts.
#[derive(Debug, Clone)]
pub struct SchemaStore {
    candidates: Vec<PathBuf>,
}

impl SchemaStore {
    /// Creates a store probing `candidates` in order.
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// Creates a store from the install-relative candidates in `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.schema_dir_candidates())
    }

    /// Returns the first candidate directory that exists.
    ///
    /// # Errors
    /// - `MissingSchemaDirectory` when no candidate exists. This is a
    ///   deployment defect, not a per-request condition.
    pub fn schema_dir(&self) -> SchemaResult<PathBuf> {
        if let Some(dir) = self.candidates.iter().find(|dir| dir.is_dir()) {
            return Ok(dir.clone());
        }
        error!(
            "event=schema_dir module=schema status=error error_code=schema_dir_missing candidates={}",
            self.candidates.len()
        );
        Err(SchemaError::MissingSchemaDirectory {
            candidates: self.candidates.clone(),
        })
    }

    /// Loads schema `version` in `format`.
    ///
    /// # Errors
    /// - `InvalidVersion` when the version is malformed or has no artifact.
    /// - `MissingSchemaDirectory` when the store is misconfigured.
    /// - `Inflate`/`Parse` when a JSON artifact is corrupt.
    pub fn get_schema(&self, version: &str, format: SchemaFormat) -> SchemaResult<SchemaArtifact> {
        let started_at = Instant::now();
        if !is_safe_version(version) {
            warn!(
                "event=schema_load module=schema status=error format={format} error_code=invalid_version"
            );
            return Err(SchemaError::InvalidVersion {
                version: version.to_string(),
            });
        }

        let dir = self.schema_dir()?;
        let path = dir.join(format!("{version}{}", format.file_suffix()));

        let artifact = match format {
            SchemaFormat::Json => SchemaArtifact::Document(load_json(&path, version)?),
            SchemaFormat::Xml => SchemaArtifact::Stream(BufReader::new(open_artifact(&path, version)?)),
        };

        info!(
            "event=schema_load module=schema status=ok format={format} version={version} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(artifact)
    }

    /// Loads a schema using a format name as received from a caller.
    ///
    /// The format is checked before anything touches the filesystem.
    pub fn get_schema_named(&self, version: &str, format: &str) -> SchemaResult<SchemaArtifact> {
        let format = format.parse::<SchemaFormat>().inspect_err(|_| {
            error!("event=schema_load module=schema status=error error_code=unsupported_format");
        })?;
        self.get_schema(version, format)
    }

    /// Lists the versions available in `format`, sorted.
    pub fn available_versions(&self, format: SchemaFormat) -> SchemaResult<Vec<String>> {
        let dir = self.schema_dir()?;
        let entries = std::fs::read_dir(&dir).map_err(|source| SchemaError::Io {
            path: dir.clone(),
            source,
        })?;

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SchemaError::Io {
                path: dir.clone(),
                source,
            })?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(version) = name.strip_suffix(format.file_suffix()) {
                if is_safe_version(version) {
                    versions.push(version.to_string());
                }
            }
        }
        versions.sort();
        Ok(versions)
    }
}

/// Opens a regular file; directories and other non-files count as missing.
fn open_artifact(path: &Path, version: &str) -> SchemaResult<File> {
    let opened = File::open(path).and_then(|file| {
        if file.metadata()?.is_file() {
            Ok(file)
        } else {
            Err(std::io::Error::other("not a regular file"))
        }
    });
    opened.map_err(|err| {
        debug!(
            "event=schema_open module=schema status=error path={} error={err}",
            path.display()
        );
        SchemaError::InvalidVersion {
            version: version.to_string(),
        }
    })
}

fn load_json(path: &Path, version: &str) -> SchemaResult<Value> {
    let file = open_artifact(path, version)?;
    let mut text = String::new();
    ZlibDecoder::new(BufReader::new(file))
        .read_to_string(&mut text)
        .map_err(|source| SchemaError::Inflate {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&text).map_err(|source| SchemaError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn is_safe_version(version: &str) -> bool {
    !version.is_empty()
        && version != "."
        && version != ".."
        && !version.contains(['/', '\\', '\0'])
}
