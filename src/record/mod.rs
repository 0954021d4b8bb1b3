//! # Record Exchange
//!
//! Current and previous listing snapshots, fetched over the memory bridge
//! and parsed with `serde_json`. Snapshots are read-only for the request.

mod errors;
mod exchange;
#[allow(clippy::module_inception)]
mod record;

pub use errors::{RecordError, RecordResult};
pub use exchange::RecordExchange;
pub use record::{json_type_name, Fields, Lookup, Record};
