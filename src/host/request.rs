//! Validation requests and the per-request host state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

use super::errors::{HostError, HostResult};
use super::memory::{decode_lossy, decode_str};
use super::outcome::{OutcomeStatus, ValidationOutcome};
use crate::bridge::{decode_flag, BridgeError, BridgeResult, Selector};
use crate::diagnostics::Diagnostic;
use crate::effects::EffectMap;
use crate::observability::{log_event_with_fields, Event, Logger, Severity};

/// One validation request: two snapshots as UTF-8 JSON text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
    pub current: String,
    pub previous: String,
}

impl ValidationRequest {
    /// Build from parsed trees; no previous snapshot is sent as `null`
    pub fn new(current: &Value, previous: Option<&Value>) -> Self {
        Self::from_raw(
            current.to_string(),
            previous.unwrap_or(&Value::Null).to_string(),
        )
    }

    /// Build from text exactly as given, well-formed or not
    pub fn from_raw(current: impl Into<String>, previous: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            received_at: Utc::now(),
            current: current.into(),
            previous: previous.into(),
        }
    }

    /// Read both snapshots from disk. Files must hold JSON.
    pub fn from_files(current: &Path, previous: Option<&Path>) -> HostResult<Self> {
        let current = read_json(current)?;
        let previous = previous.map(read_json).transpose()?;
        Ok(Self::new(&current, previous.as_ref()))
    }

    /// Text of one snapshot
    pub fn snapshot(&self, selector: Selector) -> &str {
        match selector {
            Selector::Current => &self.current,
            Selector::Previous => &self.previous,
        }
    }
}

fn read_json(path: &Path) -> HostResult<Value> {
    let contents = fs::read(path).map_err(|e| HostError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_slice(&contents).map_err(|e| HostError::InvalidInput {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Host-side state for one request.
///
/// Each `on_*` method is the host half of one import. Diagnostics are kept
/// in arrival order; effects go into an [`EffectMap`] that is only handed
/// out when the request completes.
#[derive(Debug)]
pub struct RequestState {
    request_id: Uuid,
    started_at: DateTime<Utc>,
    started: Instant,
    current: Vec<u8>,
    previous: Vec<u8>,
    diagnostics: Vec<Diagnostic>,
    effects: EffectMap,
    host_calls: u64,
    fault: Option<BridgeError>,
    trace: bool,
}

impl RequestState {
    pub fn new(request: &ValidationRequest, trace: bool) -> Self {
        Self {
            request_id: request.id,
            started_at: Utc::now(),
            started: Instant::now(),
            current: request.current.as_bytes().to_vec(),
            previous: request.previous.as_bytes().to_vec(),
            diagnostics: Vec::new(),
            effects: EffectMap::new(),
            host_calls: 0,
            fault: None,
            trace,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn host_calls(&self) -> u64 {
        self.host_calls
    }

    /// First rejected host call, if any
    pub fn fault(&self) -> Option<&BridgeError> {
        self.fault.as_ref()
    }

    /// Remember the first rejected call. Later calls become no-ops.
    pub fn record_fault(&mut self, err: BridgeError) {
        log_event_with_fields(
            Event::HostFault,
            &[
                ("reason", &err.to_string()),
                ("request_id", &self.request_id.to_string()),
            ],
        );
        if self.fault.is_none() {
            self.fault = Some(err);
        }
    }

    /// Log one host call with its raw arguments, when tracing is on
    pub fn trace(&self, call: &str, args: &[(&str, i32)]) {
        if !self.trace || !Logger::enabled(Severity::Trace) {
            return;
        }
        let rendered: Vec<(&str, String)> = args
            .iter()
            .map(|(name, value)| (*name, value.to_string()))
            .collect();
        let mut fields: Vec<(&str, &str)> = vec![("call", call)];
        fields.extend(rendered.iter().map(|(name, value)| (*name, value.as_str())));
        Logger::trace(Event::HostCall.as_str(), &fields);
    }

    /// Two-phase fill. Writes nothing when `buffer` is too small; always
    /// returns the snapshot length.
    pub fn on_fetch(&mut self, selector: Selector, buffer: &mut [u8]) -> BridgeResult<i32> {
        self.host_calls += 1;
        let snapshot = match selector {
            Selector::Current => &self.current,
            Selector::Previous => &self.previous,
        };
        let len = i32::try_from(snapshot.len()).map_err(|_| BridgeError::TooLarge {
            what: selector.import_name(),
            len: snapshot.len(),
        })?;
        if snapshot.len() <= buffer.len() {
            buffer[..snapshot.len()].copy_from_slice(snapshot);
        }
        Ok(len)
    }

    pub fn on_diagnostic(&mut self, message: &[u8]) {
        self.host_calls += 1;
        self.diagnostics
            .push(Diagnostic::info(decode_lossy(message).into_owned()));
    }

    pub fn on_error(&mut self, field: &[u8], message: &[u8]) -> BridgeResult<()> {
        self.host_calls += 1;
        let field = decode_str(field, "field")?;
        let message = decode_str(message, "message")?;
        self.diagnostics.push(Diagnostic::error(field, message));
        Ok(())
    }

    pub fn on_warn(&mut self, field: &[u8], message: &[u8]) -> BridgeResult<()> {
        self.host_calls += 1;
        let field = decode_str(field, "field")?;
        let message = decode_str(message, "message")?;
        self.diagnostics.push(Diagnostic::warning(field, message));
        Ok(())
    }

    pub fn on_set_required(&mut self, field: &[u8], value: i32) -> BridgeResult<()> {
        self.host_calls += 1;
        let field = decode_str(field, "field")?;
        self.effects.set_required(field, decode_flag(value));
        Ok(())
    }

    pub fn on_set_display(&mut self, field: &[u8], value: i32) -> BridgeResult<()> {
        self.host_calls += 1;
        let field = decode_str(field, "field")?;
        self.effects.set_display(field, decode_flag(value));
        Ok(())
    }

    /// The value must be JSON; the host keeps its own parsed copy
    pub fn on_set(&mut self, field: &[u8], value: &[u8]) -> BridgeResult<()> {
        self.host_calls += 1;
        let field = decode_str(field, "field")?;
        let value = decode_str(value, "value")?;
        let value: Value = serde_json::from_str(value).map_err(|e| BridgeError::InvalidJson {
            what: "value",
            reason: e.to_string(),
        })?;
        self.effects.set_value(field, value);
        Ok(())
    }

    /// Close the request. `abort` is the reason the entry point did not
    /// return normally; a recorded fault also aborts. Effects survive only
    /// a normal return.
    pub fn finish(self, abort: Option<String>) -> ValidationOutcome {
        let abort = abort.or_else(|| {
            self.fault
                .as_ref()
                .map(|fault| format!("host call rejected: {}", fault))
        });

        let status = match abort {
            Some(reason) => OutcomeStatus::Aborted { reason },
            None => OutcomeStatus::Completed {
                effects: self.effects,
            },
        };

        ValidationOutcome {
            request_id: self.request_id,
            started_at: self.started_at,
            duration_ms: self.started.elapsed().as_millis() as u64,
            host_calls: self.host_calls,
            diagnostics: self.diagnostics,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(current: &str) -> RequestState {
        RequestState::new(&ValidationRequest::from_raw(current, "null"), false)
    }

    #[test]
    fn test_new_request_defaults_previous_to_null() {
        let request = ValidationRequest::new(&json!({"ListPrice": 1}), None);
        assert_eq!(request.previous, "null");
        assert_eq!(request.current, r#"{"ListPrice":1}"#);
    }

    #[test]
    fn test_fill_reports_length_without_writing_when_too_small() {
        let mut state = state(r#"{"a":1}"#);
        let mut small = [0_u8; 3];
        assert_eq!(state.on_fetch(Selector::Current, &mut small).unwrap(), 7);
        assert_eq!(small, [0, 0, 0]);

        let mut exact = [0_u8; 7];
        assert_eq!(state.on_fetch(Selector::Current, &mut exact).unwrap(), 7);
        assert_eq!(&exact, br#"{"a":1}"#);
    }

    #[test]
    fn test_fill_previous() {
        let mut state = state("{}");
        let mut buffer = [0_u8; 4];
        assert_eq!(state.on_fetch(Selector::Previous, &mut buffer).unwrap(), 4);
        assert_eq!(&buffer, b"null");
    }

    #[test]
    fn test_set_requires_json() {
        let mut state = state("{}");
        let err = state.on_set(b"ClosePrice", b"{not json").unwrap_err();
        assert!(matches!(err, BridgeError::InvalidJson { .. }));
    }

    #[test]
    fn test_strict_field_decoding() {
        let mut state = state("{}");
        assert!(state.on_error(&[0xff], b"bad").is_err());
        assert!(state.on_set_required(&[0xc3], 1).is_err());
    }

    #[test]
    fn test_finish_completed_keeps_effects() {
        let mut state = state("{}");
        state.on_set_required(b"ClosePrice", 1).unwrap();
        state.on_diagnostic(b"hello");

        let outcome = state.finish(None);
        assert!(!outcome.is_aborted());
        assert_eq!(outcome.host_calls, 2);
        assert_eq!(
            outcome.effect("ClosePrice").unwrap().required,
            Some(true)
        );
    }

    #[test]
    fn test_finish_aborted_drops_effects_keeps_diagnostics() {
        let mut state = state("[]");
        state.on_set_display(b"ClosePrice", 0).unwrap();
        state.on_diagnostic(b"Data was not an object");

        let outcome = state.finish(Some("unreachable".into()));
        assert!(outcome.is_aborted());
        assert!(outcome.effects().is_none());
        assert_eq!(outcome.diagnostics.len(), 1);
    }

    #[test]
    fn test_started_at_is_execution_time() {
        let request = ValidationRequest::from_raw("{}", "null");
        std::thread::sleep(std::time::Duration::from_millis(5));
        let outcome = RequestState::new(&request, false).finish(None);
        assert!(outcome.started_at > request.received_at);
    }

    #[test]
    fn test_fault_aborts() {
        let mut state = state("{}");
        state.record_fault(BridgeError::MissingMemory);
        let outcome = state.finish(None);
        assert!(outcome.is_aborted());
        assert!(outcome.abort_reason().unwrap().contains("host call rejected"));
    }
}
