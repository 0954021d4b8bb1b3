//! Validation entry point
//!
//! One call per request: read records, apply rules, report. A rule set
//! returns `Err(Fatal)` instead of trapping; only the outermost wasm export
//! turns that into an abort.

use crate::bridge::{HostAdapter, MemoryBridge};
use crate::diagnostics::DiagnosticChannel;
use crate::effects::FieldEffects;
use crate::record::RecordExchange;

use super::errors::{Fatal, ValidationResult};
use super::rules::RulesValidator;

/// Everything rule logic may touch during one request
pub struct Guest<H> {
    bridge: MemoryBridge<H>,
}

impl<H: HostAdapter> Guest<H> {
    pub fn new(host: H) -> Self {
        Self {
            bridge: MemoryBridge::new(host),
        }
    }

    pub fn records(&mut self) -> RecordExchange<'_, H> {
        RecordExchange::new(&mut self.bridge)
    }

    pub fn diagnostics(&mut self) -> DiagnosticChannel<'_, H> {
        DiagnosticChannel::new(&mut self.bridge)
    }

    pub fn effects(&mut self) -> FieldEffects<'_, H> {
        FieldEffects::new(&mut self.bridge)
    }

    pub fn into_host(self) -> H {
        self.bridge.into_inner()
    }
}

/// A rule set
pub trait Validator {
    fn validate<H: HostAdapter>(&self, guest: &mut Guest<H>) -> ValidationResult<()>;
}

/// Run one validation request against `host`.
///
/// Parse and shape failures are announced with a process diagnostic before
/// the `Fatal` is returned.
pub fn run<V, H>(validator: &V, host: H) -> ValidationResult<()>
where
    V: Validator,
    H: HostAdapter,
{
    let mut guest = Guest::new(host);

    match validator.validate(&mut guest) {
        Ok(()) => Ok(()),
        Err(fatal) => {
            announce(&mut guest, &fatal);
            Err(fatal)
        }
    }
}

/// Load a rule set from JSON and run it against `host`.
///
/// A rule set that does not load is announced the same way a malformed
/// record is.
pub fn run_rules<H: HostAdapter>(rules_json: &[u8], host: H) -> ValidationResult<()> {
    match RulesValidator::from_json(rules_json) {
        Ok(validator) => run(&validator, host),
        Err(fatal) => {
            announce(&mut Guest::new(host), &fatal);
            Err(fatal)
        }
    }
}

fn announce<H: HostAdapter>(guest: &mut Guest<H>, fatal: &Fatal) {
    if fatal.kind().reports_diagnostic() {
        // The request is lost either way; a failed send changes nothing.
        let _ = guest.diagnostics().diagnostic(fatal.message());
    }
}

/// The export a host invokes once per request
#[cfg(target_arch = "wasm32")]
#[no_mangle]
pub extern "C" fn validate() {
    use crate::bridge::WasmImports;

    if run(&super::listing::ListingValidator, WasmImports).is_err() {
        core::arch::wasm32::unreachable()
    }
}

/// Rule-set entry point. A packaging step places the rule file in linear
/// memory and exports a `validate` that calls this with its location.
#[cfg(target_arch = "wasm32")]
#[no_mangle]
pub extern "C" fn validate_target(ptr: *const u8, len: usize) {
    use crate::bridge::WasmImports;

    // SAFETY: the caller passes a range inside this module's own memory
    // that holds the rule file and is never written.
    let rules_json = unsafe { core::slice::from_raw_parts(ptr, len) };
    if run_rules(rules_json, WasmImports).is_err() {
        core::arch::wasm32::unreachable()
    }
}
