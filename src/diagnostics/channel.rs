//! Diagnostic channel.
//!
//! Every call is transmitted immediately. Nothing is buffered guest-side, so
//! findings already sent survive a later abort.

use crate::bridge::{BridgeResult, HostAdapter, MemoryBridge, Outgoing};

pub struct DiagnosticChannel<'b, H> {
    bridge: &'b mut MemoryBridge<H>,
}

impl<'b, H: HostAdapter> DiagnosticChannel<'b, H> {
    pub fn new(bridge: &'b mut MemoryBridge<H>) -> Self {
        Self { bridge }
    }

    /// Process-scoped finding
    pub fn diagnostic(&mut self, message: &str) -> BridgeResult<()> {
        self.bridge.send(Outgoing::Diagnostic { message })
    }

    /// Field-scoped error
    pub fn error(&mut self, field: &str, message: &str) -> BridgeResult<()> {
        self.bridge.send(Outgoing::Error { field, message })
    }

    /// Field-scoped warning
    pub fn warn(&mut self, field: &str, message: &str) -> BridgeResult<()> {
        self.bridge.send(Outgoing::Warn { field, message })
    }
}
