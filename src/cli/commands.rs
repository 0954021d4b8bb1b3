//! CLI command implementations
//!
//! Every command prints the full [`ValidationOutcome`] as one JSON response.
//! Diagnostics never change the exit status; an aborted request does.

use chrono::{SecondsFormat, Utc};
use std::fs;
use std::path::Path;

use crate::host::{
    NativeRuntime, RuntimeConfig, ValidationOutcome, ValidationRequest, ValidationRuntime,
    WasmtimeRuntime,
};
use crate::observability::{Logger, Severity};
use crate::validator::{ListingValidator, RulesValidator};

use super::args::Command;
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::write_response;

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Run {
            module,
            data,
            previous_data,
            config,
            verbose,
        } => run_module(
            &module,
            &data,
            previous_data.as_deref(),
            config.as_deref(),
            verbose,
        ),
        Command::Check {
            data,
            previous_data,
            verbose,
        } => check(&data, previous_data.as_deref(), verbose),
        Command::Rules {
            rules,
            data,
            previous_data,
            verbose,
        } => check_rules(&rules, &data, previous_data.as_deref(), verbose),
    }
}

/// Run a validator module against one listing
pub fn run_module(
    module: &Path,
    data: &Path,
    previous_data: Option<&Path>,
    config_path: Option<&Path>,
    verbose: u8,
) -> CliResult<()> {
    let mut config = match config_path {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };
    if verbose >= 2 {
        config.trace_host_calls = true;
    }
    Logger::set_min_severity(log_threshold(verbose, config.trace_host_calls));

    let request = ValidationRequest::from_files(data, previous_data)?;
    let runtime = WasmtimeRuntime::from_file(module, config)?;
    let outcome = runtime.execute(&request)?;

    report(&outcome)
}

/// Run the built-in listing rules natively
pub fn check(data: &Path, previous_data: Option<&Path>, verbose: u8) -> CliResult<()> {
    Logger::set_min_severity(log_threshold(verbose, false));

    let config = RuntimeConfig {
        trace_host_calls: verbose >= 2,
        ..RuntimeConfig::default()
    };

    let request = ValidationRequest::from_files(data, previous_data)?;
    let runtime = NativeRuntime::with_config(ListingValidator, config);
    let outcome = runtime.execute(&request)?;

    report(&outcome)
}

/// Run a rule file natively. `TODAY()` and `NOW()` answer with the
/// current UTC date and time.
pub fn check_rules(
    rules_path: &Path,
    data: &Path,
    previous_data: Option<&Path>,
    verbose: u8,
) -> CliResult<()> {
    Logger::set_min_severity(log_threshold(verbose, false));

    let rules_json = fs::read(rules_path).map_err(|e| {
        CliError::io_error(format!("Failed to read '{}': {}", rules_path.display(), e))
    })?;
    let now = Utc::now();
    let validator = RulesValidator::from_json(&rules_json)
        .map_err(|fatal| CliError::new(CliErrorCode::InputError, fatal.to_string()))?
        .with_clock(
            now.format("%Y-%m-%d").to_string(),
            now.to_rfc3339_opts(SecondsFormat::Millis, true),
        );

    let config = RuntimeConfig {
        trace_host_calls: verbose >= 2,
        ..RuntimeConfig::default()
    };

    let request = ValidationRequest::from_files(data, previous_data)?;
    let runtime = NativeRuntime::with_config(validator, config);
    let outcome = runtime.execute(&request)?;

    report(&outcome)
}

/// Print the outcome; an aborted request becomes an error after printing
fn report(outcome: &ValidationOutcome) -> CliResult<()> {
    write_response(serde_json::to_value(outcome)?)?;

    match outcome.abort_reason() {
        Some(reason) => Err(CliError::validator_aborted(reason)),
        None => Ok(()),
    }
}

/// Minimum log severity for `-v` count. Host-call tracing needs TRACE.
fn log_threshold(verbose: u8, trace_host_calls: bool) -> Severity {
    if trace_host_calls {
        return Severity::Trace;
    }
    match verbose {
        0 => Severity::Warn,
        1 => Severity::Info,
        _ => Severity::Trace,
    }
}
