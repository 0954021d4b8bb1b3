//! The host capability the guest is written against.
//!
//! Every method mirrors one host import. A byte slice stands for the
//! (length, pointer) pair of the raw interface; flags are `i32` 0/1.

use super::selector::Selector;

/// Synchronous host interface
///
/// Implementations never retain the slices they are handed. `fetch` follows
/// the fill contract: when the snapshot is longer than `buffer` nothing is
/// written, and in every case the snapshot's byte length is returned.
pub trait HostAdapter {
    /// Query or fill a record snapshot
    fn fetch(&mut self, selector: Selector, buffer: &mut [u8]) -> i32;

    /// Process-scoped diagnostic
    fn diagnostic(&mut self, message: &[u8]);

    /// Field-scoped error
    fn error(&mut self, field: &[u8], message: &[u8]);

    /// Field-scoped warning
    fn warn(&mut self, field: &[u8], message: &[u8]);

    /// Required flag
    fn set_required(&mut self, field: &[u8], value: i32);

    /// Display flag
    fn set_display(&mut self, field: &[u8], value: i32);

    /// Value override as UTF-8 JSON text
    fn set(&mut self, field: &[u8], value: &[u8]);
}

impl<H: HostAdapter + ?Sized> HostAdapter for &mut H {
    fn fetch(&mut self, selector: Selector, buffer: &mut [u8]) -> i32 {
        (**self).fetch(selector, buffer)
    }

    fn diagnostic(&mut self, message: &[u8]) {
        (**self).diagnostic(message)
    }

    fn error(&mut self, field: &[u8], message: &[u8]) {
        (**self).error(field, message)
    }

    fn warn(&mut self, field: &[u8], message: &[u8]) {
        (**self).warn(field, message)
    }

    fn set_required(&mut self, field: &[u8], value: i32) {
        (**self).set_required(field, value)
    }

    fn set_display(&mut self, field: &[u8], value: i32) {
        (**self).set_display(field, value)
    }

    fn set(&mut self, field: &[u8], value: &[u8]) {
        (**self).set(field, value)
    }
}
