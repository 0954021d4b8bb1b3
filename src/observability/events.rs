//! Observable events of the validation host
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Runtime configuration loaded
    ConfigLoaded,
    /// Validator module compiled and linked
    ModuleLoaded,
    /// Validation request begins
    ValidationStart,
    /// Entry point returned normally
    ValidationComplete,
    /// Entry point trapped or returned a fatal outcome
    ValidationAborted,
    /// One guest → host call (trace only)
    HostCall,
    /// A host call was rejected
    HostFault,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ModuleLoaded => "MODULE_LOADED",
            Event::ValidationStart => "VALIDATION_START",
            Event::ValidationComplete => "VALIDATION_COMPLETE",
            Event::ValidationAborted => "VALIDATION_ABORTED",
            Event::HostCall => "HOST_CALL",
            Event::HostFault => "HOST_FAULT",
        }
    }

    /// Default severity when logged through [`super::log_event_with_fields`]
    pub fn severity(&self) -> Severity {
        match self {
            Event::HostCall => Severity::Trace,
            Event::ValidationAborted | Event::HostFault => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
