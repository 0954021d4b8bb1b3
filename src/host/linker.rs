//! wasmtime bindings for the `reso` import module.
//!
//! Each import validates the guest's (length, pointer) pairs against linear
//! memory and forwards to [`RequestState`]. A rejected call traps the guest
//! with the [`BridgeError`] as the trap payload.

use wasmtime::{Caller, Engine, Extern, Linker, Module, StoreLimits, StoreLimitsBuilder};

use super::config::RuntimeConfig;
use super::errors::{HostError, HostResult};
use super::memory::{guest_slice, guest_slice_mut};
use super::request::RequestState;
use crate::bridge::{BridgeError, BridgeResult, Selector, IMPORT_MODULE};

/// Store data for one request
pub struct HostState {
    pub request: RequestState,
    pub(crate) limits: StoreLimits,
}

impl HostState {
    pub fn new(request: RequestState, config: &RuntimeConfig) -> Self {
        Self {
            request,
            limits: StoreLimitsBuilder::new()
                .memory_size(config.max_memory_bytes)
                .instances(1)
                .build(),
        }
    }
}

/// Run `f` with the guest's exported memory and the request state.
fn with_guest<R>(
    caller: &mut Caller<'_, HostState>,
    f: impl FnOnce(&mut [u8], &mut RequestState) -> BridgeResult<R>,
) -> wasmtime::Result<R> {
    let memory = match caller.get_export("memory").and_then(Extern::into_memory) {
        Some(memory) => memory,
        None => {
            caller.data_mut().request.record_fault(BridgeError::MissingMemory);
            return Err(wasmtime::Error::new(BridgeError::MissingMemory));
        }
    };

    let (data, state) = memory.data_and_store_mut(&mut *caller);
    match f(data, &mut state.request) {
        Ok(value) => Ok(value),
        Err(err) => {
            state.request.record_fault(err.clone());
            Err(wasmtime::Error::new(err))
        }
    }
}

fn fetch(
    caller: &mut Caller<'_, HostState>,
    selector: Selector,
    len: i32,
    ptr: i32,
) -> wasmtime::Result<i32> {
    with_guest(caller, |memory, state| {
        state.trace(selector.import_name(), &[("len", len), ("ptr", ptr)]);
        let buffer = guest_slice_mut(memory, len, ptr, selector.import_name())?;
        state.on_fetch(selector, buffer)
    })
}

/// Host half of a field-scoped diagnostic import
type ReportFn = fn(&mut RequestState, &[u8], &[u8]) -> BridgeResult<()>;

/// Host half of a field flag import
type FlagFn = fn(&mut RequestState, &[u8], i32) -> BridgeResult<()>;

fn report(
    caller: &mut Caller<'_, HostState>,
    call: &'static str,
    handler: ReportFn,
    args: [i32; 4],
) -> wasmtime::Result<()> {
    let [field_len, field_ptr, message_len, message_ptr] = args;
    with_guest(caller, |memory, state| {
        state.trace(
            call,
            &[
                ("field_len", field_len),
                ("field_ptr", field_ptr),
                ("message_len", message_len),
                ("message_ptr", message_ptr),
            ],
        );
        let field = guest_slice(memory, field_len, field_ptr, "field")?;
        let message = guest_slice(memory, message_len, message_ptr, "message")?;
        handler(state, field, message)
    })
}

fn flag(
    caller: &mut Caller<'_, HostState>,
    call: &'static str,
    handler: FlagFn,
    args: [i32; 3],
) -> wasmtime::Result<()> {
    let [field_len, field_ptr, value] = args;
    with_guest(caller, |memory, state| {
        state.trace(
            call,
            &[("field_len", field_len), ("field_ptr", field_ptr), ("value", value)],
        );
        let field = guest_slice(memory, field_len, field_ptr, "field")?;
        handler(state, field, value)
    })
}

/// Linker exposing exactly the `reso` imports. Any other import the module
/// declares is satisfied by a function that traps when called.
pub fn create_linker(engine: &Engine, module: &Module) -> HostResult<Linker<HostState>> {
    let mut linker = Linker::new(engine);
    let link = |e: wasmtime::Error| HostError::Link(e.to_string());

    linker
        .func_wrap(
            IMPORT_MODULE,
            "data",
            |mut caller: Caller<'_, HostState>, len: i32, ptr: i32| {
                fetch(&mut caller, Selector::Current, len, ptr)
            },
        )
        .map_err(link)?;

    linker
        .func_wrap(
            IMPORT_MODULE,
            "previous_data",
            |mut caller: Caller<'_, HostState>, len: i32, ptr: i32| {
                fetch(&mut caller, Selector::Previous, len, ptr)
            },
        )
        .map_err(link)?;

    linker
        .func_wrap(
            IMPORT_MODULE,
            "diagnostic",
            |mut caller: Caller<'_, HostState>, len: i32, ptr: i32| {
                with_guest(&mut caller, |memory, state| {
                    state.trace("diagnostic", &[("len", len), ("ptr", ptr)]);
                    let message = guest_slice(memory, len, ptr, "diagnostic")?;
                    state.on_diagnostic(message);
                    Ok(())
                })
            },
        )
        .map_err(link)?;

    linker
        .func_wrap(
            IMPORT_MODULE,
            "error",
            |mut caller: Caller<'_, HostState>, fl: i32, fp: i32, ml: i32, mp: i32| {
                report(&mut caller, "error", RequestState::on_error, [fl, fp, ml, mp])
            },
        )
        .map_err(link)?;

    linker
        .func_wrap(
            IMPORT_MODULE,
            "warn",
            |mut caller: Caller<'_, HostState>, fl: i32, fp: i32, ml: i32, mp: i32| {
                report(&mut caller, "warn", RequestState::on_warn, [fl, fp, ml, mp])
            },
        )
        .map_err(link)?;

    linker
        .func_wrap(
            IMPORT_MODULE,
            "set_required",
            |mut caller: Caller<'_, HostState>, len: i32, ptr: i32, value: i32| {
                flag(
                    &mut caller,
                    "set_required",
                    RequestState::on_set_required,
                    [len, ptr, value],
                )
            },
        )
        .map_err(link)?;

    linker
        .func_wrap(
            IMPORT_MODULE,
            "set_display",
            |mut caller: Caller<'_, HostState>, len: i32, ptr: i32, value: i32| {
                flag(
                    &mut caller,
                    "set_display",
                    RequestState::on_set_display,
                    [len, ptr, value],
                )
            },
        )
        .map_err(link)?;

    linker
        .func_wrap(
            IMPORT_MODULE,
            "set",
            |mut caller: Caller<'_, HostState>, fl: i32, fp: i32, vl: i32, vp: i32| {
                with_guest(&mut caller, |memory, state| {
                    state.trace(
                        "set",
                        &[
                            ("field_len", fl),
                            ("field_ptr", fp),
                            ("value_len", vl),
                            ("value_ptr", vp),
                        ],
                    );
                    let field = guest_slice(memory, fl, fp, "field")?;
                    let value = guest_slice(memory, vl, vp, "value")?;
                    state.on_set(field, value)
                })
            },
        )
        .map_err(link)?;

    linker.define_unknown_imports_as_traps(module).map_err(link)?;

    Ok(linker)
}
