//! Error classes shared by every core module.
//!
//! # Responsibility
//! - Give callers one way to tell client mistakes from server defects.
//!
//! # Invariants
//! - Module errors stay concrete enums; this module only classifies them.

use std::fmt::{Display, Formatter};

/// Coarse classification of a core error for transport mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad client input, e.g. an unknown schema version.
    InvalidInput,
    /// Server-side defect: misconfiguration or a caller bug.
    Server,
    /// The process must not keep serving requests.
    Fatal,
}

impl ErrorClass {
    /// HTTP status a transport layer should answer with.
    pub fn status_code(self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::Server | Self::Fatal => 500,
        }
    }
}

impl Display for ErrorClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::InvalidInput => "invalid_input",
            Self::Server => "server",
            Self::Fatal => "fatal",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorClass;

    #[test]
    fn client_errors_map_to_bad_request() {
        assert_eq!(ErrorClass::InvalidInput.status_code(), 400);
    }

    #[test]
    fn server_and_fatal_map_to_internal_error() {
        assert_eq!(ErrorClass::Server.status_code(), 500);
        assert_eq!(ErrorClass::Fatal.status_code(), 500);
    }
}
