//! # Bridge Errors

use thiserror::Error;

/// Result type for memory bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Failures while moving bytes across the host boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("{what} length is less than zero: {len}")]
    NegativeLength { what: &'static str, len: i32 },

    #[error("{what} pointer is less than zero: {ptr}")]
    NegativePointer { what: &'static str, ptr: i32 },

    #[error("{what} length changed between size query ({expected}) and fill ({actual})")]
    LengthChanged {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{what} does not fit in guest memory (len {len} at ptr {ptr})")]
    OutOfBounds {
        what: &'static str,
        len: usize,
        ptr: usize,
    },

    #[error("{what} is {len} bytes, too large for an i32 length")]
    TooLarge { what: &'static str, len: usize },

    #[error("{what} is invalid UTF-8")]
    InvalidUtf8 { what: &'static str },

    #[error("{what} was not a valid JSON value: {reason}")]
    InvalidJson { what: &'static str, reason: String },

    #[error("Failed to encode value for '{field}': {reason}")]
    Encode { field: String, reason: String },

    #[error("Guest module does not export a memory")]
    MissingMemory,
}

impl BridgeError {
    /// Whether the failure came from encoding a value rather than moving bytes
    pub fn is_encode(&self) -> bool {
        matches!(self, BridgeError::Encode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_changed_display() {
        let err = BridgeError::LengthChanged {
            what: "data",
            expected: 12,
            actual: 40,
        };
        let display = err.to_string();
        assert!(display.contains("data"));
        assert!(display.contains("12"));
        assert!(display.contains("40"));
    }

    #[test]
    fn test_is_encode() {
        assert!(BridgeError::Encode {
            field: "ClosePrice".into(),
            reason: "key must be a string".into()
        }
        .is_encode());
        assert!(!BridgeError::MissingMemory.is_encode());
    }
}
