//! resoval - Listing field validation across a narrow WebAssembly boundary
//!
//! The guest side (bridge, records, diagnostics, effects, validator) builds
//! for `wasm32-unknown-unknown` and exports `validate`. The `host` feature
//! adds the wasmtime runtime, logging and the CLI.

pub mod bridge;
pub mod diagnostics;
pub mod effects;
pub mod record;
pub mod validator;

#[cfg(feature = "host")]
pub mod cli;
#[cfg(feature = "host")]
pub mod host;
#[cfg(feature = "host")]
pub mod observability;
