//! In-process host: a [`HostAdapter`] backed directly by a [`RequestState`].
//!
//! Runs Rust validators without a sandbox. A rejected call is recorded as a
//! fault and every later call is ignored, as if the guest had trapped.

use crate::bridge::{BridgeResult, HostAdapter, Selector};

use super::request::{RequestState, ValidationRequest};

#[derive(Debug)]
pub struct InMemoryHost {
    state: RequestState,
}

impl InMemoryHost {
    pub fn new(request: &ValidationRequest) -> Self {
        Self {
            state: RequestState::new(request, false),
        }
    }

    pub fn with_trace(request: &ValidationRequest, trace: bool) -> Self {
        Self {
            state: RequestState::new(request, trace),
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn into_state(self) -> RequestState {
        self.state
    }

    fn faulted(&self) -> bool {
        self.state.fault().is_some()
    }

    fn guard(&mut self, result: BridgeResult<()>) {
        if let Err(err) = result {
            self.state.record_fault(err);
        }
    }
}

fn len_of(bytes: &[u8]) -> i32 {
    i32::try_from(bytes.len()).unwrap_or(i32::MAX)
}

impl HostAdapter for InMemoryHost {
    fn fetch(&mut self, selector: Selector, buffer: &mut [u8]) -> i32 {
        if self.faulted() {
            return 0;
        }
        self.state
            .trace(selector.import_name(), &[("len", len_of(buffer))]);
        match self.state.on_fetch(selector, buffer) {
            Ok(len) => len,
            Err(err) => {
                self.state.record_fault(err);
                0
            }
        }
    }

    fn diagnostic(&mut self, message: &[u8]) {
        if self.faulted() {
            return;
        }
        self.state.trace("diagnostic", &[("len", len_of(message))]);
        self.state.on_diagnostic(message);
    }

    fn error(&mut self, field: &[u8], message: &[u8]) {
        if self.faulted() {
            return;
        }
        self.state.trace(
            "error",
            &[("field_len", len_of(field)), ("message_len", len_of(message))],
        );
        let result = self.state.on_error(field, message);
        self.guard(result);
    }

    fn warn(&mut self, field: &[u8], message: &[u8]) {
        if self.faulted() {
            return;
        }
        self.state.trace(
            "warn",
            &[("field_len", len_of(field)), ("message_len", len_of(message))],
        );
        let result = self.state.on_warn(field, message);
        self.guard(result);
    }

    fn set_required(&mut self, field: &[u8], value: i32) {
        if self.faulted() {
            return;
        }
        self.state
            .trace("set_required", &[("len", len_of(field)), ("value", value)]);
        let result = self.state.on_set_required(field, value);
        self.guard(result);
    }

    fn set_display(&mut self, field: &[u8], value: i32) {
        if self.faulted() {
            return;
        }
        self.state
            .trace("set_display", &[("len", len_of(field)), ("value", value)]);
        let result = self.state.on_set_display(field, value);
        self.guard(result);
    }

    fn set(&mut self, field: &[u8], value: &[u8]) {
        if self.faulted() {
            return;
        }
        self.state.trace(
            "set",
            &[("field_len", len_of(field)), ("value_len", len_of(value))],
        );
        let result = self.state.on_set(field, value);
        self.guard(result);
    }
}
