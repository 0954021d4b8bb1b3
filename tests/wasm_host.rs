//! WebAssembly Host Tests
//!
//! Hand-written WAT modules against the wasmtime runtime:
//! - Two-phase fetch and the no-write-when-too-small rule
//! - Effect and diagnostic imports
//! - Traps abort the request, keep diagnostics and drop effects
//! - Bad pointers, bad JSON and unknown imports trap
//! - Setup failures are host errors, not aborts

use resoval::diagnostics::Severity;
use resoval::host::{
    RuntimeConfig, ValidationOutcome, ValidationRequest, ValidationRuntime, WasmtimeRuntime,
};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const IMPORTS: &str = r#"
  (import "reso" "data" (func $data (param i32 i32) (result i32)))
  (import "reso" "previous_data" (func $previous_data (param i32 i32) (result i32)))
  (import "reso" "diagnostic" (func $diagnostic (param i32 i32)))
  (import "reso" "error" (func $error (param i32 i32 i32 i32)))
  (import "reso" "warn" (func $warn (param i32 i32 i32 i32)))
  (import "reso" "set_required" (func $set_required (param i32 i32 i32)))
  (import "reso" "set_display" (func $set_display (param i32 i32 i32)))
  (import "reso" "set" (func $set (param i32 i32 i32 i32)))
"#;

/// Module with every `reso` import, one page of exported memory, and `body`
fn module(body: &str) -> String {
    format!(
        "(module {} (memory (export \"memory\") 1) {})",
        IMPORTS, body
    )
}

fn runtime(wat: &str) -> WasmtimeRuntime {
    runtime_with(wat, RuntimeConfig::default())
}

fn runtime_with(wat: &str, config: RuntimeConfig) -> WasmtimeRuntime {
    WasmtimeRuntime::from_bytes("test", wat.as_bytes(), config).unwrap()
}

fn execute(runtime: &WasmtimeRuntime, current: Value) -> ValidationOutcome {
    runtime
        .execute(&ValidationRequest::new(&current, None))
        .unwrap()
}

/// Echo a snapshot back as a process diagnostic via the two-phase fetch
fn echo(import: &str) -> String {
    module(&format!(
        r#"
        (func (export "validate")
          (local $len i32)
          (local.set $len (call ${import} (i32.const 0) (i32.const 0)))
          (drop (call ${import} (local.get $len) (i32.const 1024)))
          (call $diagnostic (local.get $len) (i32.const 1024)))
        "#,
        import = import
    ))
}

// =============================================================================
// Fetch Tests
// =============================================================================

/// The guest receives the current snapshot byte for byte.
#[test]
fn test_two_phase_fetch_current() {
    let runtime = runtime(&echo("data"));
    let listing = json!({"ListPrice": 250000, "Remarks": "Café ☕"});

    let outcome = execute(&runtime, listing.clone());
    assert!(outcome.is_completed());
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].message, listing.to_string());
}

/// With no previous listing the host supplies `null`.
#[test]
fn test_previous_defaults_to_null() {
    let runtime = runtime(&echo("previous_data"));
    let outcome = execute(&runtime, json!({}));
    assert_eq!(outcome.diagnostics[0].message, "null");
}

/// A buffer shorter than the snapshot is left untouched and the full
/// length is still returned.
#[test]
fn test_short_buffer_not_written() {
    let wat = module(
        r#"
        (data (i32.const 0) "zz")
        (func (export "validate")
          (local $len i32)
          (local.set $len (call $data (i32.const 2) (i32.const 0)))
          (call $diagnostic (i32.const 2) (i32.const 0))
          (if (i32.eq (local.get $len) (i32.const 15))
            (then (call $diagnostic (i32.const 0) (i32.const 0)))))
        "#,
    );
    let outcome = execute(&runtime(&wat), json!({"ListPrice": 1}));

    assert!(outcome.is_completed());
    assert_eq!(outcome.diagnostics.len(), 2);
    assert_eq!(outcome.diagnostics[0].message, "zz");
}

// =============================================================================
// Effect and Diagnostic Tests
// =============================================================================

/// Effects and field diagnostics land on the named field.
#[test]
fn test_effects_and_errors() {
    let wat = module(
        r#"
        (data (i32.const 0) "ClosePrice")
        (data (i32.const 16) "250000")
        (data (i32.const 32) "Close price looks high")
        (func (export "validate")
          (call $set_required (i32.const 10) (i32.const 0) (i32.const 1))
          (call $set_display (i32.const 10) (i32.const 0) (i32.const 7))
          (call $set (i32.const 10) (i32.const 0) (i32.const 6) (i32.const 16))
          (call $warn (i32.const 10) (i32.const 0) (i32.const 22) (i32.const 32))
          (call $error (i32.const 10) (i32.const 0) (i32.const 0) (i32.const 0)))
        "#,
    );
    let outcome = execute(&runtime(&wat), json!({}));

    assert!(outcome.is_completed());
    let effect = outcome.effect("ClosePrice").unwrap();
    assert_eq!(effect.required, Some(true));
    assert_eq!(effect.display, Some(true));
    assert_eq!(effect.value, Some(json!(250000)));

    assert_eq!(outcome.diagnostics.len(), 2);
    assert_eq!(outcome.diagnostics[0].severity, Severity::Warning);
    assert_eq!(outcome.diagnostics[0].message, "Close price looks high");
    assert_eq!(outcome.diagnostics[1].severity, Severity::Error);
    assert_eq!(outcome.diagnostics[1].message, "");
    assert_eq!(outcome.host_calls, 5);
}

// =============================================================================
// Abort Tests
// =============================================================================

/// A trap keeps diagnostics sent before it and drops every effect.
#[test]
fn test_trap_keeps_diagnostics_drops_effects() {
    let wat = module(
        r#"
        (data (i32.const 0) "ClosePrice")
        (data (i32.const 16) "Data was not an object")
        (func (export "validate")
          (call $set_required (i32.const 10) (i32.const 0) (i32.const 1))
          (call $diagnostic (i32.const 22) (i32.const 16))
          unreachable)
        "#,
    );
    let outcome = execute(&runtime(&wat), json!([]));

    assert!(outcome.is_aborted());
    assert!(outcome.effects().is_none());
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].message, "Data was not an object");
    assert!(outcome.abort_reason().unwrap().starts_with("trap"));
}

/// Ranges outside linear memory trap the guest.
#[test]
fn test_out_of_bounds_pointer_traps() {
    let wat = module(
        r#"
        (func (export "validate")
          (call $diagnostic (i32.const 16) (i32.const 65530)))
        "#,
    );
    let outcome = execute(&runtime(&wat), json!({}));

    assert!(outcome.is_aborted());
    assert!(outcome.diagnostics.is_empty());
    assert!(outcome
        .abort_reason()
        .unwrap()
        .contains("host call rejected"));
}

/// Negative lengths trap the guest.
#[test]
fn test_negative_length_traps() {
    let wat = module(
        r#"
        (func (export "validate")
          (drop (call $data (i32.const -1) (i32.const 0))))
        "#,
    );
    let outcome = execute(&runtime(&wat), json!({}));
    assert!(outcome.is_aborted());
}

/// `set` values must be JSON.
#[test]
fn test_invalid_set_json_traps() {
    let wat = module(
        r#"
        (data (i32.const 0) "ClosePrice")
        (data (i32.const 16) "{oops")
        (func (export "validate")
          (call $set_display (i32.const 10) (i32.const 0) (i32.const 1))
          (call $set (i32.const 10) (i32.const 0) (i32.const 5) (i32.const 16)))
        "#,
    );
    let outcome = execute(&runtime(&wat), json!({}));

    assert!(outcome.is_aborted());
    assert!(outcome.effects().is_none());
}

/// Field names must be UTF-8.
#[test]
fn test_invalid_utf8_field_traps() {
    let wat = module(
        r#"
        (data (i32.const 0) "\ff\fe")
        (func (export "validate")
          (call $set_required (i32.const 2) (i32.const 0) (i32.const 1)))
        "#,
    );
    let outcome = execute(&runtime(&wat), json!({}));
    assert!(outcome.is_aborted());
}

/// Imports outside `reso` link but trap when called.
#[test]
fn test_unknown_import_traps_when_called() {
    let uncalled = r#"
        (module
          (import "env" "clock" (func $clock (result i64)))
          (memory (export "memory") 1)
          (func (export "validate")))
    "#;
    assert!(execute(&runtime(uncalled), json!({})).is_completed());

    let called = r#"
        (module
          (import "env" "clock" (func $clock (result i64)))
          (memory (export "memory") 1)
          (func (export "validate") (drop (call $clock))))
    "#;
    assert!(execute(&runtime(called), json!({})).is_aborted());
}

/// Host calls need an exported memory.
#[test]
fn test_missing_memory_traps() {
    let wat = r#"
        (module
          (import "reso" "diagnostic" (func $diagnostic (param i32 i32)))
          (func (export "validate") (call $diagnostic (i32.const 0) (i32.const 0))))
    "#;
    let outcome = execute(&runtime(wat), json!({}));

    assert!(outcome.is_aborted());
    assert!(outcome.abort_reason().unwrap().contains("memory"));
}

// =============================================================================
// Resource Limit Tests
// =============================================================================

/// Runaway guests stop when fuel runs out.
#[test]
fn test_fuel_exhaustion_aborts() {
    let wat = module(
        r#"
        (func (export "validate")
          (loop $spin (br $spin)))
        "#,
    );
    let config = RuntimeConfig {
        fuel: Some(10_000),
        ..RuntimeConfig::default()
    };
    let outcome = execute(&runtime_with(&wat, config), json!({}));
    assert!(outcome.is_aborted());
}

/// Memory growth past the cap fails inside the guest.
#[test]
fn test_memory_growth_capped() {
    let wat = module(
        r#"
        (func (export "validate")
          (if (i32.eq (memory.grow (i32.const 4)) (i32.const -1))
            (then (call $diagnostic (i32.const 0) (i32.const 0)))))
        "#,
    );
    let config = RuntimeConfig {
        max_memory_bytes: 2 * 65536,
        ..RuntimeConfig::default()
    };
    let outcome = execute(&runtime_with(&wat, config), json!({}));

    assert!(outcome.is_completed());
    assert_eq!(outcome.diagnostics.len(), 1);
}

// =============================================================================
// Setup Error Tests
// =============================================================================

/// A module without the entry point is a host error.
#[test]
fn test_missing_export_is_host_error() {
    let runtime = runtime("(module (memory (export \"memory\") 1))");
    let err = runtime
        .execute(&ValidationRequest::new(&json!({}), None))
        .unwrap_err();
    assert_eq!(err.code(), "RESO_HOST_MISSING_EXPORT");
}

/// An entry point with the wrong signature is a host error.
#[test]
fn test_wrong_export_type_is_host_error() {
    let runtime = runtime("(module (func (export \"validate\") (param i32)))");
    let err = runtime
        .execute(&ValidationRequest::new(&json!({}), None))
        .unwrap_err();
    assert_eq!(err.code(), "RESO_HOST_MISSING_EXPORT");
}

/// The entry point name comes from configuration.
#[test]
fn test_configured_entry_point() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.json");
    fs::write(&config_path, r#"{"entry_point": "check_listing"}"#).unwrap();
    let module_path = temp_dir.path().join("rules.wat");
    fs::write(
        &module_path,
        r#"(module (memory (export "memory") 1) (func (export "check_listing")))"#,
    )
    .unwrap();

    let config = RuntimeConfig::load(&config_path).unwrap();
    let runtime = WasmtimeRuntime::from_file(&module_path, config).unwrap();
    assert!(execute(&runtime, json!({})).is_completed());
}

/// Each request runs in a fresh instance.
#[test]
fn test_requests_isolated() {
    let wat = module(
        r#"
        (global $calls (mut i32) (i32.const 0))
        (func (export "validate")
          (global.set $calls (i32.add (global.get $calls) (i32.const 1)))
          (if (i32.gt_s (global.get $calls) (i32.const 1))
            (then unreachable)))
        "#,
    );
    let runtime = runtime(&wat);
    for _ in 0..3 {
        assert!(execute(&runtime, json!({})).is_completed());
    }
}
