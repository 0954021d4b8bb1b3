//! # Memory Bridge
//!
//! Moves bytes and UTF-8 strings across the isolation boundary using only
//! lengths, offsets and raw bytes.
//!
//! - Incoming snapshots use the two-phase length/fill protocol
//! - Outgoing strings are sent once, length always explicit
//! - Lengths are never inferred from buffer contents
//! - Buffers are single-owner and single-use

mod adapter;
mod errors;
mod memory;
mod selector;
mod wasm_imports;

pub use adapter::HostAdapter;
pub use errors::{BridgeError, BridgeResult};
pub use memory::MemoryBridge;
pub use selector::{decode_flag, encode_flag, Outgoing, Selector, IMPORT_MODULE};
#[cfg(target_arch = "wasm32")]
pub use wasm_imports::WasmImports;
