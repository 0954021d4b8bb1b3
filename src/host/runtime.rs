//! Validation runtimes.
//!
//! A runtime takes one [`ValidationRequest`] and produces one
//! [`ValidationOutcome`]. Guest failure is an aborted outcome; `Err` is
//! reserved for host setup problems.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use wasmtime::{Engine, Linker, Module, Store, Trap};

use super::config::RuntimeConfig;
use super::errors::{HostError, HostResult};
use super::in_memory::InMemoryHost;
use super::linker::{create_linker, HostState};
use super::outcome::ValidationOutcome;
use super::request::{RequestState, ValidationRequest};
use crate::bridge::BridgeError;
use crate::observability::{log_event_with_fields, Event};
use crate::validator::{self, Validator};

/// Executes validators against requests
pub trait ValidationRuntime {
    fn execute(&self, request: &ValidationRequest) -> HostResult<ValidationOutcome>;

    /// Label used in logs
    fn name(&self) -> &str;
}

/// Runs a Rust validator in-process through an [`InMemoryHost`]
#[derive(Debug, Clone)]
pub struct NativeRuntime<V> {
    validator: V,
    config: RuntimeConfig,
}

impl<V: Validator> NativeRuntime<V> {
    pub fn new(validator: V) -> Self {
        Self::with_config(validator, RuntimeConfig::default())
    }

    pub fn with_config(validator: V, config: RuntimeConfig) -> Self {
        Self { validator, config }
    }
}

impl<V: Validator> ValidationRuntime for NativeRuntime<V> {
    fn execute(&self, request: &ValidationRequest) -> HostResult<ValidationOutcome> {
        log_start(self.name(), request);

        let mut host = InMemoryHost::with_trace(request, self.config.trace_host_calls);
        let abort = validator::run(&self.validator, &mut host)
            .err()
            .map(|fatal| fatal.to_string());

        let outcome = host.into_state().finish(abort);
        log_outcome(self.name(), &outcome);
        Ok(outcome)
    }

    fn name(&self) -> &str {
        "native"
    }
}

/// Runs a compiled WebAssembly validator module.
///
/// The module is compiled once; each request gets a fresh store and
/// instance so no guest state carries over between requests.
pub struct WasmtimeRuntime {
    engine: Engine,
    module: Module,
    linker: Linker<HostState>,
    config: RuntimeConfig,
    digest: String,
    name: String,
}

impl WasmtimeRuntime {
    /// Load a `.wasm` or `.wat` file
    pub fn from_file(path: &Path, config: RuntimeConfig) -> HostResult<Self> {
        let bytes = fs::read(path).map_err(|e| HostError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_bytes(&path.display().to_string(), &bytes, config)
    }

    /// Compile from binary or text format
    pub fn from_bytes(name: &str, bytes: &[u8], config: RuntimeConfig) -> HostResult<Self> {
        config.validate()?;

        let mut engine_config = wasmtime::Config::new();
        engine_config.consume_fuel(config.fuel.is_some());
        let engine = Engine::new(&engine_config).map_err(|e| HostError::Engine(e.to_string()))?;

        let module = Module::new(&engine, bytes).map_err(|e| HostError::Compile {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        let linker = create_linker(&engine, &module)?;
        let digest = format!("{:x}", Sha256::digest(bytes));

        log_event_with_fields(
            Event::ModuleLoaded,
            &[
                ("digest", &digest),
                ("module", name),
                ("size", &bytes.len().to_string()),
            ],
        );

        Ok(Self {
            engine,
            module,
            linker,
            config,
            digest,
            name: name.to_string(),
        })
    }

    /// SHA-256 of the module bytes, lowercase hex
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}

impl ValidationRuntime for WasmtimeRuntime {
    fn execute(&self, request: &ValidationRequest) -> HostResult<ValidationOutcome> {
        let state = RequestState::new(request, self.config.trace_host_calls);
        let mut store = Store::new(&self.engine, HostState::new(state, &self.config));
        store.limiter(|host| &mut host.limits);
        if let Some(fuel) = self.config.fuel {
            store
                .set_fuel(fuel)
                .map_err(|e| HostError::Engine(e.to_string()))?;
        }

        let instance = self
            .linker
            .instantiate(&mut store, &self.module)
            .map_err(|e| HostError::Instantiate(e.to_string()))?;

        let entry = instance
            .get_typed_func::<(), ()>(&mut store, &self.config.entry_point)
            .map_err(|e| HostError::MissingExport {
                name: self.config.entry_point.clone(),
                reason: e.to_string(),
            })?;

        log_start(self.name(), request);
        let abort = entry.call(&mut store, ()).err().map(|e| abort_reason(&e));

        let outcome = store.into_data().request.finish(abort);
        log_outcome(self.name(), &outcome);
        Ok(outcome)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Describe why the entry point did not return
fn abort_reason(err: &wasmtime::Error) -> String {
    if let Some(fault) = err.downcast_ref::<BridgeError>() {
        format!("host call rejected: {}", fault)
    } else if let Some(trap) = err.downcast_ref::<Trap>() {
        format!("trap: {}", trap)
    } else {
        err.to_string()
    }
}

fn log_start(runtime: &str, request: &ValidationRequest) {
    log_event_with_fields(
        Event::ValidationStart,
        &[
            ("request_id", &request.id.to_string()),
            ("runtime", runtime),
        ],
    );
}

fn log_outcome(runtime: &str, outcome: &ValidationOutcome) {
    let request_id = outcome.request_id.to_string();
    let duration = outcome.duration_ms.to_string();
    let diagnostics = outcome.diagnostics.len().to_string();

    match outcome.abort_reason() {
        Some(reason) => log_event_with_fields(
            Event::ValidationAborted,
            &[
                ("diagnostics", &diagnostics),
                ("duration_ms", &duration),
                ("reason", reason),
                ("request_id", &request_id),
                ("runtime", runtime),
            ],
        ),
        None => log_event_with_fields(
            Event::ValidationComplete,
            &[
                ("diagnostics", &diagnostics),
                ("duration_ms", &duration),
                ("request_id", &request_id),
                ("runtime", runtime),
            ],
        ),
    }
}
