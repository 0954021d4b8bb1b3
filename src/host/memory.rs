//! Guest memory access for host calls.
//!
//! Every (length, pointer) pair from the guest is checked before use:
//! neither may be negative and the range must lie inside linear memory.

use std::borrow::Cow;
use std::ops::Range;

use crate::bridge::{BridgeError, BridgeResult};

fn guest_range(
    memory_len: usize,
    len: i32,
    ptr: i32,
    what: &'static str,
) -> BridgeResult<Range<usize>> {
    if len < 0 {
        return Err(BridgeError::NegativeLength { what, len });
    }
    if ptr < 0 {
        return Err(BridgeError::NegativePointer { what, ptr });
    }
    let (len, ptr) = (len as usize, ptr as usize);

    match ptr.checked_add(len) {
        Some(end) if end <= memory_len => Ok(ptr..end),
        _ => Err(BridgeError::OutOfBounds { what, len, ptr }),
    }
}

/// Read-only view of `len` bytes at `ptr`
pub fn guest_slice<'a>(
    memory: &'a [u8],
    len: i32,
    ptr: i32,
    what: &'static str,
) -> BridgeResult<&'a [u8]> {
    let range = guest_range(memory.len(), len, ptr, what)?;
    Ok(&memory[range])
}

/// Writable view of `len` bytes at `ptr`
pub fn guest_slice_mut<'a>(
    memory: &'a mut [u8],
    len: i32,
    ptr: i32,
    what: &'static str,
) -> BridgeResult<&'a mut [u8]> {
    let range = guest_range(memory.len(), len, ptr, what)?;
    Ok(&mut memory[range])
}

/// Strict UTF-8 decode
pub fn decode_str<'a>(bytes: &'a [u8], what: &'static str) -> BridgeResult<&'a str> {
    std::str::from_utf8(bytes).map_err(|_| BridgeError::InvalidUtf8 { what })
}

/// Best-effort decode for free-form diagnostics
pub fn decode_lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}
