//! Shared support code for the BMRBdep deposition backend.
//! This crate owns schema retrieval, the deposition log store, and the small
//! vocabularies and guards the request handlers lean on.

pub mod config;
pub mod db;
pub mod error;
pub mod files;
pub mod logging;
pub mod model;
pub mod release;
pub mod repo;
pub mod residues;
pub mod schema;

pub use config::{AppConfig, ConfigError};
pub use db::{ensure_log_exists, update_entire_database, DbError, DbResult};
pub use error::ErrorClass;
pub use files::{sanitize_filename, FilenameError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{DepositionEntry, EntryValidationError};
pub use release::{read_release, ReleaseError};
pub use repo::entry_repo::{
    DepositionLogRepository, EntryListQuery, RepoError, RepoResult, SqliteDepositionLogRepository,
};
pub use residues::{residue_code, residue_mappings, PolymerClass};
pub use schema::{SchemaArtifact, SchemaError, SchemaFormat, SchemaStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
