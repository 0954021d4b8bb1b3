//! Binding of [`HostAdapter`] to the raw `reso` imports of a wasm32 guest.
//!
//! Slice lowering is target independent; the import block and the adapter
//! exist only on wasm32.

#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

#[cfg(target_arch = "wasm32")]
use super::adapter::HostAdapter;
#[cfg(target_arch = "wasm32")]
use super::selector::Selector;

/// The real host, reached through linear-memory offsets
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct WasmImports;

/// (length, pointer) for a read-only slice; an empty slice is (0, 0)
fn raw(bytes: &[u8]) -> (i32, i32) {
    if bytes.is_empty() {
        (0, 0)
    } else {
        (bytes.len() as i32, bytes.as_ptr() as i32)
    }
}

/// (length, pointer) for a buffer the host will fill
fn raw_mut(bytes: &mut [u8]) -> (i32, i32) {
    if bytes.is_empty() {
        (0, 0)
    } else {
        (bytes.len() as i32, bytes.as_mut_ptr() as i32)
    }
}

#[cfg(target_arch = "wasm32")]
impl HostAdapter for WasmImports {
    fn fetch(&mut self, selector: Selector, buffer: &mut [u8]) -> i32 {
        let (len, ptr) = raw_mut(buffer);
        // SAFETY: `ptr` addresses `len` writable bytes owned by `buffer` for
        // the duration of the call; the host does not keep the pointer.
        unsafe {
            match selector {
                Selector::Current => sys::data(len, ptr),
                Selector::Previous => sys::previous_data(len, ptr),
            }
        }
    }

    fn diagnostic(&mut self, message: &[u8]) {
        let (len, ptr) = raw(message);
        unsafe { sys::diagnostic(len, ptr) }
    }

    fn error(&mut self, field: &[u8], message: &[u8]) {
        let (field_len, field_ptr) = raw(field);
        let (message_len, message_ptr) = raw(message);
        unsafe { sys::error(field_len, field_ptr, message_len, message_ptr) }
    }

    fn warn(&mut self, field: &[u8], message: &[u8]) {
        let (field_len, field_ptr) = raw(field);
        let (message_len, message_ptr) = raw(message);
        unsafe { sys::warn(field_len, field_ptr, message_len, message_ptr) }
    }

    fn set_required(&mut self, field: &[u8], value: i32) {
        let (field_len, field_ptr) = raw(field);
        unsafe { sys::set_required(field_len, field_ptr, value) }
    }

    fn set_display(&mut self, field: &[u8], value: i32) {
        let (field_len, field_ptr) = raw(field);
        unsafe { sys::set_display(field_len, field_ptr, value) }
    }

    fn set(&mut self, field: &[u8], value: &[u8]) {
        let (field_len, field_ptr) = raw(field);
        let (value_len, value_ptr) = raw(value);
        unsafe { sys::set(field_len, field_ptr, value_len, value_ptr) }
    }
}

#[cfg(target_arch = "wasm32")]
mod sys {
    #[link(wasm_import_module = "reso")]
    extern "C" {
        pub fn data(len: i32, ptr: i32) -> i32;
        pub fn previous_data(len: i32, ptr: i32) -> i32;
        pub fn diagnostic(len: i32, ptr: i32);
        pub fn error(field_len: i32, field_ptr: i32, message_len: i32, message_ptr: i32);
        pub fn warn(field_len: i32, field_ptr: i32, message_len: i32, message_ptr: i32);
        pub fn set_required(field_len: i32, field_ptr: i32, value: i32);
        pub fn set_display(field_len: i32, field_ptr: i32, value: i32);
        pub fn set(field_len: i32, field_ptr: i32, value_len: i32, value_ptr: i32);
    }
}
