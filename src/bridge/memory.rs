//! Memory bridge: owned buffers in, borrowed strings out.
//!
//! Incoming data uses the two-phase protocol. Phase one hands the host an
//! empty buffer and learns the byte length; phase two hands it a freshly
//! allocated buffer of exactly that length to fill. Outgoing strings are
//! passed once as (length, pointer) and are not retained by the host.

use super::adapter::HostAdapter;
use super::errors::{BridgeError, BridgeResult};
use super::selector::{encode_flag, Outgoing, Selector};

/// Owns the host adapter for the duration of one request
#[derive(Debug)]
pub struct MemoryBridge<H> {
    host: H,
}

impl<H: HostAdapter> MemoryBridge<H> {
    /// Wrap a host adapter
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// Give the adapter back
    pub fn into_inner(self) -> H {
        self.host
    }

    /// Fetch a snapshot as raw bytes.
    ///
    /// The returned buffer is exclusively the caller's and is never reused.
    pub fn fetch_bytes(&mut self, selector: Selector) -> BridgeResult<Vec<u8>> {
        let what = selector.import_name();

        let expected = checked_len(what, self.host.fetch(selector, &mut []))?;

        let mut buffer = vec![0_u8; expected];
        let actual = checked_len(what, self.host.fetch(selector, &mut buffer))?;

        // A different answer means the host did not fill our buffer.
        if actual != expected {
            return Err(BridgeError::LengthChanged {
                what,
                expected,
                actual,
            });
        }

        Ok(buffer)
    }

    /// Fetch a snapshot as UTF-8 text
    pub fn fetch_string(&mut self, selector: Selector) -> BridgeResult<String> {
        let bytes = self.fetch_bytes(selector)?;
        String::from_utf8(bytes).map_err(|_| BridgeError::InvalidUtf8 {
            what: selector.import_name(),
        })
    }

    /// Transmit one outgoing call
    pub fn send(&mut self, call: Outgoing<'_>) -> BridgeResult<()> {
        match call {
            Outgoing::Diagnostic { message } => {
                let message = outgoing("message", message)?;
                self.host.diagnostic(message);
            }
            Outgoing::Error { field, message } => {
                let field = outgoing("field", field)?;
                let message = outgoing("message", message)?;
                self.host.error(field, message);
            }
            Outgoing::Warn { field, message } => {
                let field = outgoing("field", field)?;
                let message = outgoing("message", message)?;
                self.host.warn(field, message);
            }
            Outgoing::SetRequired { field, required } => {
                let field = outgoing("field", field)?;
                self.host.set_required(field, encode_flag(required));
            }
            Outgoing::SetDisplay { field, display } => {
                let field = outgoing("field", field)?;
                self.host.set_display(field, encode_flag(display));
            }
            Outgoing::Set { field, value_json } => {
                let field = outgoing("field", field)?;
                let value = outgoing("value", value_json)?;
                self.host.set(field, value);
            }
        }
        Ok(())
    }
}

/// Lengths reported by the host must be non-negative
fn checked_len(what: &'static str, len: i32) -> BridgeResult<usize> {
    usize::try_from(len).map_err(|_| BridgeError::NegativeLength { what, len })
}

/// Outgoing strings must be describable with an i32 length
fn outgoing<'a>(what: &'static str, value: &'a str) -> BridgeResult<&'a [u8]> {
    let bytes = value.as_bytes();
    if i32::try_from(bytes.len()).is_err() {
        return Err(BridgeError::TooLarge {
            what,
            len: bytes.len(),
        });
    }
    Ok(bytes)
}
