//! Runtime configuration.
//!
//! Loaded from an optional JSON file; every field has a default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::errors::{HostError, HostResult};
use crate::observability::{log_event_with_fields, Event};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Cap on guest linear memory (default 64MB)
    #[serde(default = "default_max_memory")]
    pub max_memory_bytes: usize,

    /// Fuel per request; `None` disables metering
    #[serde(default)]
    pub fuel: Option<u64>,

    /// Export invoked once per request
    #[serde(default = "default_entry_point")]
    pub entry_point: String,

    /// Log every host call at TRACE
    #[serde(default)]
    pub trace_host_calls: bool,
}

fn default_max_memory() -> usize {
    64 * 1024 * 1024
}

fn default_entry_point() -> String {
    "validate".to_string()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_memory_bytes: default_max_memory(),
            fuel: None,
            entry_point: default_entry_point(),
            trace_host_calls: false,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> HostResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| HostError::Config(format!("Failed to read config: {}", e)))?;

        let config: RuntimeConfig = serde_json::from_str(&content)
            .map_err(|e| HostError::Config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", &path.display().to_string())],
        );

        Ok(config)
    }

    pub fn validate(&self) -> HostResult<()> {
        if self.max_memory_bytes == 0 {
            return Err(HostError::Config("max_memory_bytes must be > 0".into()));
        }

        if self.entry_point.trim().is_empty() {
            return Err(HostError::Config("entry_point must not be empty".into()));
        }

        if self.fuel == Some(0) {
            return Err(HostError::Config("fuel must be > 0 when set".into()));
        }

        Ok(())
    }
}
