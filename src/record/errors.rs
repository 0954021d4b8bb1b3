//! # Record Errors

use thiserror::Error;

use crate::bridge::BridgeError;

/// Result type for record operations
pub type RecordResult<T> = Result<T, RecordError>;

/// Structural failures of a record snapshot.
///
/// None of these are recoverable within a request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// Bytes from the host were not well-formed JSON
    #[error("{what} was not valid JSON: {reason}")]
    Parse { what: &'static str, reason: String },

    /// Top-level value was not an object
    #[error("Data was not an object")]
    Shape { found: &'static str },

    /// The bytes never arrived intact
    #[error(transparent)]
    Transport(#[from] BridgeError),
}
