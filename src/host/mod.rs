//! # Validation Host
//!
//! Runs validators against listing snapshots and collects what they report.
//!
//! - [`WasmtimeRuntime`] executes a sandboxed WebAssembly module
//! - [`NativeRuntime`] executes a Rust validator in-process
//! - Both produce a [`ValidationOutcome`]: diagnostics always, field
//!   effects only when the entry point returned normally

mod config;
mod errors;
mod in_memory;
mod linker;
mod memory;
mod outcome;
mod request;
mod runtime;

pub use config::RuntimeConfig;
pub use errors::{HostError, HostResult};
pub use in_memory::InMemoryHost;
pub use linker::{create_linker, HostState};
pub use memory::{decode_lossy, decode_str, guest_slice, guest_slice_mut};
pub use outcome::{OutcomeStatus, ValidationOutcome};
pub use request::{RequestState, ValidationRequest};
pub use runtime::{NativeRuntime, ValidationRuntime, WasmtimeRuntime};
