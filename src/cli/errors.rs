//! CLI-specific error types

use std::fmt;
use std::io;

use crate::host::HostError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdout)
    IoError,
    /// Listing file missing or not JSON
    InputError,
    /// Module could not be compiled, linked or instantiated
    RuntimeError,
    /// Validator ended the request without returning normally
    ValidatorAborted,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "RESO_CLI_CONFIG_ERROR",
            Self::IoError => "RESO_CLI_IO_ERROR",
            Self::InputError => "RESO_CLI_INPUT_ERROR",
            Self::RuntimeError => "RESO_CLI_RUNTIME_ERROR",
            Self::ValidatorAborted => "RESO_CLI_VALIDATOR_ABORTED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Validator aborted
    pub fn validator_aborted(reason: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ValidatorAborted, reason)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Process exit status: 2 when the validator aborted, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        match self.code {
            CliErrorCode::ValidatorAborted => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<HostError> for CliError {
    fn from(e: HostError) -> Self {
        let code = match e {
            HostError::Config(_) => CliErrorCode::ConfigError,
            HostError::Io { .. } => CliErrorCode::IoError,
            HostError::InvalidInput { .. } => CliErrorCode::InputError,
            _ => CliErrorCode::RuntimeError,
        };
        Self::new(code, format!("{} ({})", e, e.code()))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
