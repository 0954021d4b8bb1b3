//! Observability for the validation host
//!
//! - Structured logging (JSON lines)
//! - Typed lifecycle events
//!
//! # Usage
//!
//! ```ignore
//! use resoval::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::ValidationStart, &[("request_id", "…")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
