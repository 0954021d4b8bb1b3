//! Fatal outcomes of a validation request
//!
//! Error codes:
//! - RESO_RECORD_PARSE (FATAL)
//! - RESO_RECORD_SHAPE (FATAL)
//! - RESO_BRIDGE_TRANSPORT (FATAL)
//! - RESO_VALUE_ENCODE (FATAL)
//! - RESO_RULES_INVALID (FATAL)
//!
//! Business-rule findings are never errors; they travel as diagnostics.

use std::fmt;

use crate::bridge::BridgeError;
use crate::record::RecordError;

/// Why a request could not run to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalKind {
    /// Host sent malformed JSON
    Parse,
    /// Current record was not an object
    Shape,
    /// Bytes could not be moved across the boundary
    Transport,
    /// A value override could not be serialized
    Encode,
    /// A rule set could not be loaded or an expression did not parse
    Rules,
}

impl FatalKind {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            FatalKind::Parse => "RESO_RECORD_PARSE",
            FatalKind::Shape => "RESO_RECORD_SHAPE",
            FatalKind::Transport => "RESO_BRIDGE_TRANSPORT",
            FatalKind::Encode => "RESO_VALUE_ENCODE",
            FatalKind::Rules => "RESO_RULES_INVALID",
        }
    }

    /// Structural input failures and broken rule sets are announced with a
    /// process diagnostic
    pub fn reports_diagnostic(&self) -> bool {
        matches!(self, FatalKind::Parse | FatalKind::Shape | FatalKind::Rules)
    }
}

impl fmt::Display for FatalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Typed abort returned by the entry point.
///
/// The validation core never stops its own execution; whoever drives the
/// entry point decides how a `Fatal` ends the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fatal {
    kind: FatalKind,
    message: String,
}

impl Fatal {
    pub fn new(kind: FatalKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> FatalKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Plain message, suitable as a process diagnostic
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Fatal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[FATAL] {}: {}", self.kind.code(), self.message)
    }
}

impl std::error::Error for Fatal {}

impl From<RecordError> for Fatal {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::Parse { .. } => Fatal::new(FatalKind::Parse, err.to_string()),
            RecordError::Shape { .. } => Fatal::new(FatalKind::Shape, err.to_string()),
            RecordError::Transport(inner) => inner.into(),
        }
    }
}

impl From<BridgeError> for Fatal {
    fn from(err: BridgeError) -> Self {
        let kind = if err.is_encode() {
            FatalKind::Encode
        } else {
            FatalKind::Transport
        };
        Fatal::new(kind, err.to_string())
    }
}

/// Result type for validation logic
pub type ValidationResult<T> = Result<T, Fatal>;
