//! Error types for the booking engine.

use crate::model::Status;
use std::fmt;

/// Result type for booking operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the booking engine.
///
/// All operations return `Result<T>` where `Result` is defined as `std::result::Result<T, Error>`.
/// Every variant is recoverable at the caller boundary; none are fatal to the process.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A booking or user-admin input failed validation.
    ///
    /// Validation short-circuits on the first failing field, so this always
    /// carries exactly one field name and one user-correctable message.
    Validation {
        /// Wire name of the rejected field (e.g. `"email"`, `"idNumber"`).
        field: &'static str,
        /// User-facing message describing the problem.
        message: String,
    },

    /// The requested `(date, time)` slot is already held by a PENDING appointment.
    ///
    /// COMPLETED and CANCELLED appointments do not occupy slots, so this only
    /// fires while the prior occupant is still pending.
    Conflict(String),

    /// Lookup miss: no appointment (or user) matched the given key.
    NotFound(String),

    /// Malformed or incomplete import payload.
    ///
    /// Import validation is all-or-nothing per batch: a single bad element
    /// rejects the whole payload and leaves the collection unchanged.
    Format(String),

    /// A status transition was requested from a terminal state.
    ///
    /// Only PENDING → COMPLETED and PENDING → CANCELLED are permitted.
    InvalidTransition {
        /// Status currently stored on the appointment.
        from: Status,
        /// Status the caller tried to move to.
        to: Status,
    },

    /// Credentials did not match, or the session lacks the required role.
    Unauthorized(String),

    /// Storage backend error (file system, etc).
    ///
    /// Reads fall back to defaults instead of surfacing this; writes propagate it.
    Backend(String),

    /// Serialization failed when encoding a value for storage or export.
    Serialization(String),

    /// Deserialization failed when decoding a stored value.
    ///
    /// The typed store treats this as a fallback condition on reads; the
    /// variant surfaces only where a parse failure is a hard error (import).
    Deserialization(String),

    /// Generic error with custom message.
    Other(String),
}

impl Error {
    /// Convenience constructor for field-level validation failures.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation { field, message } => {
                write!(f, "Validation error ({}): {}", field, message)
            }
            Error::Conflict(msg) => write!(f, "Conflict: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::Format(msg) => write!(f, "Format error: {}", msg),
            Error::InvalidTransition { from, to } => {
                write!(f, "Invalid status transition: {} -> {}", from, to)
            }
            Error::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Error::Backend(msg) => write!(f, "Backend error: {}", msg),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Error::Deserialization(msg) => write!(f, "Deserialization error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::Backend(e.to_string())
        } else if e.is_syntax() || e.is_data() || e.is_eof() {
            Error::Deserialization(e.to_string())
        } else {
            Error::Serialization(e.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Backend(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}
