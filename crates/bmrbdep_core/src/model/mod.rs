//! Domain records tracked by the deposition backend.
//!
//! # Responsibility
//! - Define the canonical row shape of the deposition log.
//!
//! # Invariants
//! - Restart tokens identify one deposition and are never shared.
//! - Numeric identifiers are assigned by storage, never by callers.

pub mod entry;
