//! # Diagnostic Channel
//!
//! Process-level and field-level findings. Order is preserved, nothing is
//! deduplicated, and there is no limit; aggregation is the host's concern.

mod channel;
mod diagnostic;

pub use channel::DiagnosticChannel;
pub use diagnostic::{Diagnostic, Severity};
