//! Versioned schema retrieval.
//!
//! # Responsibility
//! - Resolve a schema version and format to an artifact on disk.
//! - Inflate and parse JSON schemas; hand XML schemas back as open streams.
//!
//! # Invariants
//! - No caching: every request re-reads from disk.
//! - Missing artifacts are client errors; missing directories and
//!   unsupported formats are server errors.

mod store;

pub use store::{SchemaArtifact, SchemaError, SchemaFormat, SchemaResult, SchemaStore};
