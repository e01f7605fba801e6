//! Repository layer over the deposition tracking database.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from the deposition workflow.
//!
//! # Invariants
//! - Repository writes enforce `DepositionEntry::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateRestartId`)
//!   in addition to DB transport errors.

pub mod entry_repo;
