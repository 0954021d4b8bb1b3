//! # Host Errors
//!
//! Setup and input failures on the host side. An aborted validation is not
//! a `HostError`; it is a normal [`super::ValidationOutcome`].

use thiserror::Error;

/// Result type for host operations
pub type HostResult<T> = Result<T, HostError>;

#[derive(Debug, Clone, Error)]
pub enum HostError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("Contents of '{path}' was not JSON: {reason}")]
    InvalidInput { path: String, reason: String },

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Failed to compile module '{name}': {reason}")]
    Compile { name: String, reason: String },

    #[error("Failed to link host imports: {0}")]
    Link(String),

    #[error("Failed to instantiate module: {0}")]
    Instantiate(String),

    #[error("Module has no `{name}` export of type () -> (): {reason}")]
    MissingExport { name: String, reason: String },
}

impl HostError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            HostError::Config(_) => "RESO_HOST_CONFIG",
            HostError::Io { .. } => "RESO_HOST_IO",
            HostError::InvalidInput { .. } => "RESO_HOST_INVALID_INPUT",
            HostError::Engine(_) => "RESO_HOST_ENGINE",
            HostError::Compile { .. } => "RESO_HOST_COMPILE",
            HostError::Link(_) => "RESO_HOST_LINK",
            HostError::Instantiate(_) => "RESO_HOST_INSTANTIATE",
            HostError::MissingExport { .. } => "RESO_HOST_MISSING_EXPORT",
        }
    }

    /// Whether the caller's input, rather than the module or engine, is at fault
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            HostError::Config(_) | HostError::Io { .. } | HostError::InvalidInput { .. }
        )
    }
}
