//! # Validation Entry Point
//!
//! Orchestrates one request: fetch records, derive field values with
//! explicit defaults, apply rules, emit diagnostics and field effects.
//!
//! Two rule sets are provided: the built-in [`ListingValidator`] and the
//! data-driven [`RulesValidator`], which evaluates RETS expressions loaded
//! from a rule file.
//!
//! Structural failures (malformed JSON, non-object record, unloadable rule
//! set) end the request with a typed [`Fatal`]. Rule violations are
//! diagnostics and never end it.

mod entry;
mod errors;
mod listing;
mod rules;

pub use entry::{run, run_rules, Guest, Validator};
pub use errors::{Fatal, FatalKind, ValidationResult};
pub use listing::{Listing, ListingValidator, MlsStatus, CLOSE_PRICE, LIST_PRICE, MLS_STATUS};
pub use rules::{Rule, RuleAction, Rules, RulesValidator, DEFAULT_NOW, DEFAULT_TODAY};
